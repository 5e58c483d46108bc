//! # Output Module
//!
//! Display hand-off for the accumulated image:
//! - Normalization of the running radiance sum by the iteration count
//! - Progressive visualization via TEV (The EXR Viewer)
//! - PNG export (clamped, sRGB encoded) and EXR export (linear HDR)

use std::net::TcpStream;

use exr::prelude::write_rgb_file;
use image::{ImageBuffer, Rgb};
use log::{debug, info, warn};
use tev_client::{PacketCreateImage, PacketUpdateImage, TevClient};

use wavepath::material::Color;

/// Linear HDR image as handed to the writers.
pub type HdrImage = ImageBuffer<Rgb<f32>, Vec<f32>>;

const TEV_IMAGE_NAME: &str = "wavepath";
const TEV_CHANNELS: &[&str] = &["R", "G", "B"];

/// Divide the accumulated radiance by the number of iterations.
///
/// With zero iterations the image is black.
pub fn normalize(accumulated: &[Color], iterations: u32, width: u32, height: u32) -> HdrImage {
    let scale = if iterations == 0 { 0.0 } else { 1.0 / iterations as f32 };
    ImageBuffer::from_fn(width, height, |x, y| {
        let c = accumulated[(y * width + x) as usize] * scale;
        Rgb([c.x, c.y, c.z])
    })
}

/// Connection to a TEV viewer kept open across progressive updates.
pub struct TevSink {
    client: TevClient,
    address: String,
    width: u32,
    height: u32,
}

impl TevSink {
    /// Connect and create the image in TEV. Failures are logged, not fatal.
    ///
    /// `tev_address` may omit the port, in which case 14158 is used.
    pub fn connect(tev_address: &str, width: u32, height: u32) -> Option<Self> {
        // Add default port if not specified
        let address = if tev_address.contains(':') {
            tev_address.to_string()
        } else {
            format!("{}:14158", tev_address)
        };

        debug!("Attempting to connect to TEV at {}", address);
        let stream = match TcpStream::connect(&address) {
            Ok(stream) => stream,
            Err(e) => {
                warn!("Failed to connect to TEV on {}: {}", address, e);
                return None;
            }
        };
        if let Err(e) = stream.set_nodelay(true) {
            debug!("Failed to set TCP_NODELAY: {}", e);
        }

        let mut client = TevClient::wrap(stream);
        let create_packet = PacketCreateImage {
            image_name: TEV_IMAGE_NAME,
            width,
            height,
            channel_names: TEV_CHANNELS,
            grab_focus: true,
        };
        if let Err(e) = client.send(create_packet) {
            warn!("Failed to create image in TEV: {}", e);
            return None;
        }
        debug!("Image created in TEV successfully");

        Some(Self {
            client,
            address,
            width,
            height,
        })
    }

    /// Replace the TEV image contents.
    pub fn update(&mut self, image: &HdrImage) {
        // Convert image data from interleaved (RGBRGB...) to planar (RRR...GGG...BBB...) for TEV
        let pixel_count = (self.width * self.height) as usize;
        let mut planar = Vec::with_capacity(pixel_count * 3);
        for channel in 0..3 {
            planar.extend(image.pixels().map(|pixel| pixel[channel]));
        }

        let start_time = std::time::Instant::now();
        let update_packet = PacketUpdateImage {
            image_name: TEV_IMAGE_NAME,
            grab_focus: false,
            channel_names: TEV_CHANNELS,
            x: 0,
            y: 0,
            width: self.width,
            height: self.height,
            channel_offsets: &[0, pixel_count as u64, 2 * pixel_count as u64],
            channel_strides: &[1, 1, 1],
            data: &planar,
        };
        match self.client.send(update_packet) {
            Ok(_) => debug!(
                "Image data sent to TEV at {} in {:.2?}",
                self.address,
                start_time.elapsed()
            ),
            Err(e) => warn!("Failed to send image data to TEV: {}", e),
        }
    }
}

/// sRGB transfer function with the linear toe for dark values.
fn linear_to_srgb(linear: f32) -> f32 {
    if linear <= 0.0 {
        0.0
    } else if linear <= 0.0031308 {
        12.92 * linear
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    }
}

/// Quantize a normalized linear image to 8-bit sRGB.
pub fn to_ldr(image: &HdrImage) -> ImageBuffer<Rgb<u8>, Vec<u8>> {
    ImageBuffer::from_fn(image.width(), image.height(), |x, y| {
        let pixel = image.get_pixel(x, y);
        Rgb(pixel.0.map(|c| (linear_to_srgb(c.clamp(0.0, 1.0)) * 255.0).round() as u8))
    })
}

/// Save a normalized image as 8-bit PNG. I/O errors are logged.
pub fn save_image_as_png(image: &HdrImage, output_path: &str) {
    match to_ldr(image).save(output_path) {
        Ok(_) => info!("Image saved as {}", output_path),
        Err(e) => warn!("Failed to save image: {}", e),
    }
}

/// Save a normalized image as linear 32-bit float EXR. I/O errors are
/// logged.
pub fn save_image_as_exr(image: &HdrImage, output_path: &str) {
    let (width, height) = (image.width() as usize, image.height() as usize);
    let result = write_rgb_file(output_path, width, height, |x, y| {
        let pixel = image.get_pixel(x as u32, y as u32);
        (pixel[0], pixel[1], pixel[2])
    });

    match result {
        Ok(_) => info!("HDR image saved as EXR: {}", output_path),
        Err(e) => warn!("Failed to save EXR image: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_divides_by_iterations() {
        let acc = vec![Color::new(4.0, 2.0, 0.0), Color::splat(8.0)];
        let img = normalize(&acc, 4, 2, 1);
        assert_eq!(img.get_pixel(0, 0).0, [1.0, 0.5, 0.0]);
        assert_eq!(img.get_pixel(1, 0).0, [2.0, 2.0, 2.0]);
        assert_eq!(normalize(&acc, 0, 2, 1).get_pixel(1, 0).0, [0.0; 3]);
    }

    #[test]
    fn ldr_clamps_and_encodes() {
        let img: HdrImage = ImageBuffer::from_fn(3, 1, |x, _| match x {
            0 => Rgb([-1.0, 0.0, 0.0]),
            1 => Rgb([1.0, 5.0, 1.0]),
            _ => Rgb([0.5, 0.5, 0.5]),
        });
        let ldr = to_ldr(&img);
        assert_eq!(ldr.get_pixel(0, 0).0, [0, 0, 0]);
        assert_eq!(ldr.get_pixel(1, 0).0, [255, 255, 255]);
        // Mid grey encodes well above half because of the sRGB curve.
        assert!(ldr.get_pixel(2, 0).0[0] > 180);
    }
}
