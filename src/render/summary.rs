use std::path::{Path, PathBuf};

use image::{ImageFormat, Rgba, RgbaImage};

use crate::error::Result;
use crate::models::SummarySnapshot;

use super::canvas::{Align, Canvas};
use super::format::{format_gdp, format_refreshed};

pub const CANVAS_WIDTH: u32 = 800;
pub const CANVAS_HEIGHT: u32 = 600;

const MAX_ENTRIES: usize = 5;
const FIRST_ENTRY_Y: i32 = 230;
const ENTRY_SPACING: i32 = 65;
const BADGE_X: i32 = 80;
const BADGE_RADIUS: i32 = 18;
const NAME_X: i32 = 120;
const CURRENCY_X: i32 = 450;

const BACKGROUND_TOP: Rgba<u8> = Rgba([0x1e, 0x3a, 0x8a, 0xff]);
const BACKGROUND_BOTTOM: Rgba<u8> = Rgba([0x3b, 0x82, 0xf6, 0xff]);
const WHITE: Rgba<u8> = Rgba([0xff, 0xff, 0xff, 0xff]);
const BADGE: Rgba<u8> = Rgba([0xfb, 0xbf, 0x24, 0xff]);
const LIGHT_GRAY: Rgba<u8> = Rgba([0xe5, 0xe7, 0xeb, 0xff]);
const MID_GRAY: Rgba<u8> = Rgba([0x9c, 0xa3, 0xaf, 0xff]);

/// Renders the top-countries summary to a single, overwritten PNG.
#[derive(Debug, Clone)]
pub struct SummaryRenderer {
    output_path: PathBuf,
}

impl SummaryRenderer {
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.output_path
    }

    pub fn exists(&self) -> bool {
        self.output_path.is_file()
    }

    /// Paint the snapshot and write it over the previous image.
    pub fn render(&self, snapshot: &SummarySnapshot) -> Result<PathBuf> {
        let image = draw(snapshot);

        let dir = match self.output_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        // Readers of the served path only ever see a complete PNG
        let mut staged = tempfile::NamedTempFile::new_in(dir)?;
        image.write_to(&mut staged, ImageFormat::Png)?;
        staged.persist(&self.output_path).map_err(|e| e.error)?;

        tracing::info!("Summary image generated at {}", self.output_path.display());
        Ok(self.output_path.clone())
    }
}

pub fn draw(snapshot: &SummarySnapshot) -> RgbaImage {
    let mut canvas = Canvas::new(CANVAS_WIDTH, CANVAS_HEIGHT);
    canvas.vertical_gradient(BACKGROUND_TOP, BACKGROUND_BOTTOM);

    let center_x = CANVAS_WIDTH as i32 / 2;
    canvas.text("Country Data Summary", center_x, 60, 4, WHITE, Align::Center);
    canvas.text(
        &format!("Total Countries: {}", snapshot.total_countries),
        center_x,
        120,
        3,
        WHITE,
        Align::Center,
    );
    canvas.text("Top 5 Countries by GDP", center_x, 180, 3, WHITE, Align::Center);

    for (index, country) in snapshot.top_countries.iter().take(MAX_ENTRIES).enumerate() {
        let y = FIRST_ENTRY_Y + index as i32 * ENTRY_SPACING;

        canvas.fill_circle((BADGE_X, y), BADGE_RADIUS, BADGE);
        canvas.text(
            &(index + 1).to_string(),
            BADGE_X,
            y + 6,
            2,
            BACKGROUND_TOP,
            Align::Center,
        );

        canvas.text(&country.name, NAME_X, y + 5, 2, WHITE, Align::Left);
        canvas.text(
            &format!("GDP: ${}", format_gdp(country.estimated_gdp)),
            NAME_X,
            y + 28,
            2,
            LIGHT_GRAY,
            Align::Left,
        );
        canvas.text(
            &format!("({})", country.currency_code.as_deref().unwrap_or("N/A")),
            CURRENCY_X,
            y + 5,
            2,
            MID_GRAY,
            Align::Left,
        );
    }

    canvas.text(
        &format!("Last Refreshed: {}", format_refreshed(snapshot.last_refreshed_at)),
        center_x,
        CANVAS_HEIGHT as i32 - 40,
        2,
        LIGHT_GRAY,
        Align::Center,
    );

    canvas.into_image()
}
