// THEORY:
// The `sky_loader` module turns external data into a validated `Sky`. It is the
// only part of the crate that performs I/O, and it never counts anything.
//
// Three formats are understood:
// - Text: one row per line, readings separated by whitespace or commas. This is
//   the layout used when skies are written out by hand.
// - JSON: an array of arrays of integers.
// - Images: any format the `image` crate decodes. Pixels are reduced to 8-bit
//   luma and quantized into `levels` bands, so a dark pixel becomes a cold
//   reading and a bright pixel a hot one.

pub mod sky_loader {
    use std::path::Path;

    use image::DynamicImage;
    use tracing::debug;

    use crate::core_modules::error::{Result, SkyError};
    use crate::core_modules::sky::{HeatIndex, Sky};

    /// Number of bands an image is quantized into: readings 0 through 9.
    pub const DEFAULT_LEVELS: u16 = 10;

    const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "gif"];

    /// Parses a whitespace/comma separated sky. Blank lines and lines starting
    /// with `#` are ignored.
    pub fn parse_text(input: &str) -> Result<Sky> {
        let mut rows: Vec<Vec<HeatIndex>> = Vec::new();

        for (index, line) in input.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let row = line
                .split(|c: char| c.is_whitespace() || c == ',')
                .filter(|token| !token.is_empty())
                .map(|token| {
                    token.parse::<HeatIndex>().map_err(|_| SkyError::Parse {
                        line: index + 1,
                        token: token.to_string(),
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            rows.push(row);
        }

        Sky::new(rows)
    }

    /// Parses a JSON array of rows.
    pub fn parse_json(input: &str) -> Result<Sky> {
        let rows: Vec<Vec<HeatIndex>> = serde_json::from_str(input)?;
        Sky::new(rows)
    }

    /// Quantizes an image into a sky with readings `0..levels`.
    pub fn from_image(image: &DynamicImage, levels: u16) -> Result<Sky> {
        if levels == 0 {
            return Err(SkyError::InvalidConfig(
                "image quantization needs at least one level".to_string(),
            ));
        }

        let luma = image.to_luma8();
        let (width, height) = luma.dimensions();
        let cells = luma
            .pixels()
            .map(|pixel| (u32::from(pixel.0[0]) * u32::from(levels) / 256) as HeatIndex)
            .collect();

        Sky::from_flat(width as usize, height as usize, cells)
    }

    /// Loads a sky from disk, picking the format from the file extension.
    pub fn load_path(path: &Path) -> Result<Sky> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let sky = if extension == "json" {
            parse_json(&std::fs::read_to_string(path)?)?
        } else if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
            from_image(&image::open(path)?, DEFAULT_LEVELS)?
        } else {
            parse_text(&std::fs::read_to_string(path)?)?
        };

        debug!(
            path = %path.display(),
            width = sky.width(),
            height = sky.height(),
            "sky loaded"
        );
        Ok(sky)
    }
}
