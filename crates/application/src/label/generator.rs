use domain::{BadgeRecord, CommandStream};
use tracing::debug;

use super::builder::ZplBuilder;
use super::normalize::normalize;
use super::wrap::{Font, wrap};

/// 3 in x 2 in at 203 dpi.
pub const LABEL_WIDTH: u32 = 609;
pub const LABEL_HEIGHT: u32 = 406;

const QR_SIZE: u32 = 120;
const QR_RIGHT_MARGIN: u32 = 100;
const QR_Y: u32 = 60;
const QR_MAGNIFICATION: u32 = 5;
const CAPTION_GAP: u32 = 70;
const CAPTION_FONT: Font = Font::new(28, 22);

const TEXT_X: u32 = 12;
const TEXT_GUTTER: u32 = 15;
const FIRST_BLOCK_Y: u32 = 25;
const BLOCK_MARGIN: u32 = 15;

/// Font and per-line advance of one text block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockStyle {
    pub label: &'static str,
    pub font: Font,
    pub line_advance: u32,
}

pub const NAME_STYLE: BlockStyle = BlockStyle {
    label: "Name",
    font: Font::new(60, 45),
    line_advance: 65,
};
pub const COMPANY_STYLE: BlockStyle = BlockStyle {
    label: "Company",
    font: Font::new(45, 35),
    line_advance: 50,
};
pub const ROLE_STYLE: BlockStyle = BlockStyle {
    label: "Role",
    font: Font::new(40, 30),
    line_advance: 45,
};

/// Wrapped lines of one field and where the block starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBlock {
    pub style: BlockStyle,
    pub x: u32,
    pub y: u32,
    pub lines: Vec<String>,
}

impl TextBlock {
    /// Vertical origin of each line, in order.
    pub fn line_offsets(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.lines.len() as u32).map(|i| self.y + i * self.style.line_advance)
    }

    fn height(&self) -> u32 {
        self.lines.len() as u32 * self.style.line_advance
    }
}

/// Square QR block with its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Barcode {
    pub x: u32,
    pub y: u32,
    pub size: u32,
    pub payload: String,
}

/// Employee identifier printed under the barcode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caption {
    pub x: u32,
    pub y: u32,
    pub text: String,
}

/// Absolute positions of every element on a badge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelLayout {
    pub name: TextBlock,
    pub company: TextBlock,
    pub role: TextBlock,
    pub barcode: Barcode,
    pub caption: Caption,
}

/// Renders badge records into ZPL for a 609 x 406 dot label.
#[derive(Debug, Clone)]
pub struct BadgeLabelGenerator {
    base_url: String,
}

impl BadgeLabelGenerator {
    /// `base_url` is prefixed verbatim to the employee ID to form the QR payload.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Compute positions for every element of `badge`.
    pub fn layout(&self, badge: &BadgeRecord) -> LabelLayout {
        let qr_x = LABEL_WIDTH - QR_SIZE - QR_RIGHT_MARGIN;
        let text_width = qr_x - TEXT_X - TEXT_GUTTER;

        let name = Self::block(NAME_STYLE, FIRST_BLOCK_Y, &badge.name, text_width);
        let company = Self::block(
            COMPANY_STYLE,
            name.y + name.height() + BLOCK_MARGIN,
            &badge.company,
            text_width,
        );
        let role = Self::block(
            ROLE_STYLE,
            company.y + company.height() + BLOCK_MARGIN,
            &badge.role,
            text_width,
        );

        // No escaping: reserved URL characters in the ID end up in the payload as-is.
        let barcode = Barcode {
            x: qr_x,
            y: QR_Y,
            size: QR_SIZE,
            payload: format!("{}{}", self.base_url, badge.employee_id),
        };
        let caption = Caption {
            x: qr_x + QR_SIZE / 2,
            y: QR_Y + QR_SIZE + CAPTION_GAP,
            text: badge.employee_id.clone(),
        };

        LabelLayout {
            name,
            company,
            role,
            barcode,
            caption,
        }
    }

    /// Produce the full command stream for `badge`.
    pub fn generate(&self, badge: &BadgeRecord) -> CommandStream {
        let layout = self.layout(badge);
        debug!(
            name_lines = layout.name.lines.len(),
            company_lines = layout.company.lines.len(),
            role_lines = layout.role.lines.len(),
            "Badge layout computed"
        );
        Self::render(&layout)
    }

    fn block(style: BlockStyle, y: u32, text: &str, width: u32) -> TextBlock {
        TextBlock {
            style,
            x: TEXT_X,
            y,
            lines: wrap(&normalize(text), width, style.font),
        }
    }

    fn render(layout: &LabelLayout) -> CommandStream {
        let mut zpl = ZplBuilder::new().start_label(LABEL_WIDTH, LABEL_HEIGHT);

        for block in [&layout.name, &layout.company, &layout.role] {
            for (i, (line, y)) in block.lines.iter().zip(block.line_offsets()).enumerate() {
                zpl = zpl
                    .comment(&format!("{} Line {}", block.style.label, i + 1))
                    .text_field(block.x, y, block.style.font, line);
            }
        }

        let barcode = &layout.barcode;
        let caption = &layout.caption;
        zpl.comment("QR Code")
            .qr_code(barcode.x, barcode.y, QR_MAGNIFICATION, &barcode.payload)
            .comment("Employee ID")
            .text_field(caption.x, caption.y, CAPTION_FONT, &caption.text)
            .end_label()
            .build()
    }
}
