use image::{imageops::FilterType, DynamicImage, RgbImage};

#[derive(Debug, thiserror::Error)]
pub enum TensorError {
    #[error("expected 3 channels, got {0}")]
    Channels(usize),
    #[error("shape {shape:?} needs {expected} elements, data has {actual}")]
    Length {
        shape: (usize, usize, usize, usize),
        expected: usize,
        actual: usize,
    },
    #[error("batch of {0} cannot be turned into a single image")]
    Batch(usize),
    #[error("zero-sized resolution {width}x{height}")]
    EmptyResolution { width: u32, height: u32 },
}

pub type Result<T> = std::result::Result<T, TensorError>;

/// Channel-major image data, shape `(batch, channels, height, width)`, values in `[-1, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTensor {
    shape: (usize, usize, usize, usize),
    data: Vec<f32>,
}

impl ImageTensor {
    /// Wrap raw data produced by a wrapper; fails when `data` does not fill `shape`.
    pub fn new(shape: (usize, usize, usize, usize), data: Vec<f32>) -> Result<Self> {
        let (b, c, h, w) = shape;
        let expected = b * c * h * w;
        if data.len() != expected {
            return Err(TensorError::Length {
                shape,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    /// Resize `image` to `width x height` and normalize it to `[-1, 1]`.
    pub fn from_image(image: &DynamicImage, width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(TensorError::EmptyResolution { width, height });
        }
        let rgb = if image.width() == width && image.height() == height {
            image.to_rgb8()
        } else {
            image
                .resize_exact(width, height, FilterType::Lanczos3)
                .to_rgb8()
        };

        let (w, h) = (width as usize, height as usize);
        let mut data = vec![0f32; 3 * h * w];
        for (x, y, pixel) in rgb.enumerate_pixels() {
            let (x, y) = (x as usize, y as usize);
            for c in 0..3 {
                data[c * h * w + y * w + x] = f32::from(pixel[c]) / 255. * 2. - 1.;
            }
        }
        Ok(Self {
            shape: (1, 3, h, w),
            data,
        })
    }

    /// Inverse of [`ImageTensor::from_image`] for a single-image batch. Wrappers with
    /// tensor output use this to produce their final image.
    pub fn to_image(&self) -> Result<DynamicImage> {
        let (b, c, h, w) = self.shape;
        if b != 1 {
            return Err(TensorError::Batch(b));
        }
        if c != 3 {
            return Err(TensorError::Channels(c));
        }
        let mut raw = Vec::with_capacity(3 * h * w);
        for y in 0..h {
            for x in 0..w {
                for c in 0..3 {
                    let v = (self.data[c * h * w + y * w + x] + 1.) / 2. * 255.;
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    raw.push(v.clamp(0., 255.).round() as u8);
                }
            }
        }
        #[allow(clippy::cast_possible_truncation)]
        let img = RgbImage::from_raw(w as u32, h as u32, raw).ok_or(TensorError::Length {
            shape: self.shape,
            expected: 3 * h * w,
            actual: self.data.len(),
        })?;
        Ok(DynamicImage::ImageRgb8(img))
    }

    pub fn dims4(&self) -> (usize, usize, usize, usize) {
        self.shape
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }
}
