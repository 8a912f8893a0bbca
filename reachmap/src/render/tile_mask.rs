use std::io::Write;

/// an RGBA raster for one tile, row-major from the top-left pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct TileMask {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 4]>,
}

impl TileMask {
    /// a fully transparent mask.
    pub fn transparent(width: u32, height: u32) -> TileMask {
        TileMask {
            width,
            height,
            pixels: vec![[0, 0, 0, 0]; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[[u8; 4]] {
        &self.pixels
    }

    pub fn fill(&mut self, color: [u8; 4]) {
        self.pixels.fill(color);
    }

    /// clears every pixel whose center lies within `r` of `(cx, cy)`.
    /// the circle may extend beyond the tile.
    pub fn erase_circle(&mut self, cx: i64, cy: i64, r: i64) {
        if self.pixels.is_empty() || r <= 0 {
            return;
        }
        let w = self.width as i64;
        let h = self.height as i64;
        let min_x = (cx - r).max(0);
        let max_x = (cx + r).min(w - 1);
        let min_y = (cy - r).max(0);
        let max_y = (cy + r).min(h - 1);
        let r2 = (r * r) as f64;
        for py in min_y..=max_y {
            for px in min_x..=max_x {
                let dx = px as f64 + 0.5 - cx as f64;
                let dy = py as f64 + 0.5 - cy as f64;
                if dx * dx + dy * dy <= r2 {
                    self.pixels[(py * w + px) as usize] = [0, 0, 0, 0];
                }
            }
        }
    }

    pub fn alpha_at(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .map(|p| p[3])
    }

    pub fn is_transparent(&self) -> bool {
        self.pixels.iter().all(|p| p[3] == 0)
    }

    /// writes the mask as a netpbm PAM image with an RGB_ALPHA tuple type.
    pub fn write_pam<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        write!(
            out,
            "P7\nWIDTH {}\nHEIGHT {}\nDEPTH 4\nMAXVAL 255\nTUPLTYPE RGB_ALPHA\nENDHDR\n",
            self.width, self.height
        )?;
        for pixel in self.pixels.iter() {
            out.write_all(pixel)?;
        }
        Ok(())
    }
}
