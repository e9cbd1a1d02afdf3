//! Calibration page
//!
//! One dashed rule per common head width, each labelled with its width in
//! dots. The last rule printed edge to edge gives the value for PRINTER_WIDTH.

use image::Rgb;
use mcprinter::PixelGrid;

/// Widths covering common printer resolutions
pub const CALIBRATION_WIDTHS: [u32; 10] = [192, 256, 288, 320, 384, 432, 480, 512, 546, 576];

const ROW_HEIGHT: u32 = 30;
const DASH_HEIGHT: u32 = 4;
const DASH_LEN: u32 = 8;
const GAP_LEN: u32 = 4;

/// Glyph scale factor
const SCALE: u32 = 2;

const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// 3x5 digit glyphs, one row per entry, bit 2 is the left column
const FONT_3X5: [[u8; 5]; 10] = [
    [0b111, 0b101, 0b101, 0b101, 0b111],
    [0b010, 0b110, 0b010, 0b010, 0b111],
    [0b111, 0b001, 0b111, 0b100, 0b111],
    [0b111, 0b001, 0b111, 0b001, 0b111],
    [0b101, 0b101, 0b111, 0b001, 0b001],
    [0b111, 0b100, 0b111, 0b001, 0b111],
    [0b111, 0b100, 0b111, 0b101, 0b111],
    [0b111, 0b001, 0b001, 0b001, 0b001],
    [0b111, 0b101, 0b111, 0b101, 0b111],
    [0b111, 0b101, 0b111, 0b001, 0b111],
];

/// Render the calibration page
pub fn calibration_image() -> PixelGrid {
    let max_width = CALIBRATION_WIDTHS[CALIBRATION_WIDTHS.len() - 1];
    let height = CALIBRATION_WIDTHS.len() as u32 * ROW_HEIGHT;
    let mut img = PixelGrid::from_pixel(max_width, height, WHITE);

    for (i, &w) in CALIBRATION_WIDTHS.iter().enumerate() {
        let y_base = i as u32 * ROW_HEIGHT;

        for x in (0..w).filter(|x| x % (DASH_LEN + GAP_LEN) < DASH_LEN) {
            for dy in 0..DASH_HEIGHT {
                img.put_pixel(x, y_base + dy, BLACK);
            }
        }

        draw_digits(&mut img, 2, y_base + DASH_HEIGHT + 2, &w.to_string());
    }

    img
}

/// Draw `text` at 2x scale; characters other than digits leave a gap.
fn draw_digits(img: &mut PixelGrid, mut x: u32, y: u32, text: &str) {
    for ch in text.chars() {
        let Some(glyph) = ch.to_digit(10).map(|d| FONT_3X5[d as usize]) else {
            x += 4;
            continue;
        };

        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..3u32 {
                if bits & (1 << (2 - col)) == 0 {
                    continue;
                }
                for dy in 0..SCALE {
                    for dx in 0..SCALE {
                        let px = x + col * SCALE + dx;
                        let py = y + row as u32 * SCALE + dy;
                        if px < img.width() && py < img.height() {
                            img.put_pixel(px, py, BLACK);
                        }
                    }
                }
            }
        }
        // 3 columns at 2x plus 2 pixels spacing
        x += 3 * SCALE + 2;
    }
}
