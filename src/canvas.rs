use std::io;
use std::io::{ BufWriter, Write };
use std::fs::File;
use std::path::Path;

/// A canvas for drawing pixels.
///
/// The canvas owns the 8-bit RGB buffer a `Scene` renders into. Pixels are
/// stored row-major, three bytes per pixel, with the first row at the top
/// of the image.
///
/// Once rendering finishes, the `Canvas` can be used to save the pixels to
/// an image file. For now, only PPM images are supported.
#[derive(Clone, Default, Debug, PartialEq)]
pub struct Canvas {
    /// The width of the canvas, in pixels.
    pub width: usize,

    /// The height of the canvas, in pixels.
    pub height: usize,

    pixels: Vec<u8>,
}

impl Canvas {
    /// Creates a new black canvas with specified width and height.
    pub fn new(width: usize, height: usize) -> Canvas {
        Canvas {
            width,
            height,
            pixels: vec![0; width * height * 3],
        }
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// The pixel buffer, sized for `Scene::render`.
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Reads the pixel in column `x` of row `y`, counting rows from the top.
    ///
    /// Returns `None` if the location is out of bounds.
    ///
    /// # Examples
    ///
    /// ```
    /// # use whitted::canvas::Canvas;
    /// let mut canvas = Canvas::new(4, 2);
    /// canvas.pixels_mut()[(1 * 4 + 3) * 3] = 255;
    ///
    /// assert_eq!(canvas.pixel(3, 1), Some([255, 0, 0]));
    /// assert_eq!(canvas.pixel(4, 1), None);
    /// ```
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }

        let i = (y * self.width + x) * 3;
        Some([self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]])
    }

    /// Writes the canvas as a binary PPM (P6) image.
    pub fn write_ppm<W: Write>(&self, out: &mut W) -> io::Result<()> {
        // Header, then maximum color value
        write!(out, "P6\n{} {}\n255\n", self.width, self.height)?;
        out.write_all(&self.pixels)?;
        out.flush()
    }

    /// Saves a canvas to a PPM file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        self.write_ppm(&mut out)
    }
}

#[test]
fn new_canvas_is_black() {
    let c = Canvas::new(10, 20);

    assert_eq!(c.pixels().len(), 10 * 20 * 3);
    assert!(c.pixels().iter().all(|&b| b == 0));
}

#[test]
fn ppm_header_and_body() {
    let mut c = Canvas::new(2, 1);
    c.pixels_mut().copy_from_slice(&[255, 0, 0, 0, 128, 255]);

    let mut out = Vec::new();
    c.write_ppm(&mut out).unwrap();

    let header = b"P6\n2 1\n255\n";
    assert_eq!(&out[..header.len()], header);
    assert_eq!(&out[header.len()..], &[255, 0, 0, 0, 128, 255]);
}

#[test]
fn save_writes_file() {
    let c = Canvas::new(3, 2);
    let path = std::env::temp_dir().join("whitted-canvas-save-test.ppm");

    c.save(&path).unwrap();
    let written = std::fs::read(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(written.len(), b"P6\n3 2\n255\n".len() + 3 * 2 * 3);
}
