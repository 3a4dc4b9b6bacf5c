pub mod options;
pub mod palette;

use super::Octree;
use options::QuantizeOptions;
use palette::{Color, Palette};

use image::{GenericImageView, Pixel};

use std::collections::HashMap;

/// Colors of an image in row-major order, alpha discarded.
fn scan<'a, I>(img: &'a I) -> impl Iterator<Item = Color> + 'a
where
	I: GenericImageView,
	I::Pixel: Pixel<Subpixel = u8>,
{
	let (width, height) = img.dimensions();
	(0..height).flat_map(move |y| (0..width).map(move |x| img.get_pixel(x, y).to_rgb()))
}

/// Builds a palette from a stream of colors by inserting them, in order,
/// into a fresh octree and reading back its leaves.
///
/// The same stream always gives the same palette. Reordering the stream
/// can change which clusters get merged, and so the palette.
pub fn quantize_colors<C>(colors: C, options: &QuantizeOptions) -> Palette
where
	C: IntoIterator<Item = Color>,
{
	let mut tree = Octree::new(*options);
	let mut pixels = 0u64;
	for color in colors {
		tree.insert(color);
		pixels += 1;
	}
	tracing::debug!(pixels, leaves = tree.leaf_count(), "Quantization finished");
	Palette::from(tree.palette())
}

/// Selects a palette of at most `size + 1` colors for an image.
///
/// Pixels are visited row by row, top row first.
pub fn quantize<I>(img: &I, options: &QuantizeOptions) -> Palette
where
	I: GenericImageView,
	I::Pixel: Pixel<Subpixel = u8>,
{
	quantize_colors(scan(img), options)
}

/// Processes an image given a palette so as to convert it to a "rectangle"
/// of pixels each represented by a palette-color-number that most closely
/// matches the original color.
///
/// Pixels are in row-major order. An empty palette maps every pixel to 0.
pub fn quantize_to_palette<I>(img: &I, palette: &Palette) -> Vec<u32>
where
	I: GenericImageView,
	I::Pixel: Pixel<Subpixel = u8>,
{
	let mut quant_cache = HashMap::new();
	scan(img)
		.map(|pix| *quant_cache.entry(pix)
			.or_insert_with(|| palette.nearest(&pix).unwrap_or(0)))
		.collect::<Vec<_>>()
}

/// Replaces every pixel of an image with its nearest palette color.
///
/// With an empty palette the image is returned unchanged.
pub fn remap<I>(img: &I, palette: &Palette) -> image::RgbImage
where
	I: GenericImageView,
	I::Pixel: Pixel<Subpixel = u8>,
{
	let (width, height) = img.dimensions();
	let indices = quantize_to_palette(img, palette);
	image::RgbImage::from_fn(width, height, |x, y| {
		let ind = indices[(y as usize) * (width as usize) + x as usize];
		palette.colors.get(ind as usize)
			.copied()
			.unwrap_or_else(|| img.get_pixel(x, y).to_rgb())
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::node::merge::Strategy;

	#[test]
	fn scan_is_row_major() {
		let img = image::RgbImage::from_fn(2, 2, |x, y| image::Rgb([x as u8, y as u8, 0]));
		assert_eq!(scan(&img).collect::<Vec<_>>(), vec![
			image::Rgb([0, 0, 0]),
			image::Rgb([1, 0, 0]),
			image::Rgb([0, 1, 0]),
			image::Rgb([1, 1, 0]),
		]);
	}

	#[test]
	fn scan_drops_alpha() {
		let img = image::RgbaImage::from_pixel(1, 1, image::Rgba([9, 8, 7, 0]));
		assert_eq!(scan(&img).collect::<Vec<_>>(), vec![image::Rgb([9, 8, 7])]);
	}

	#[test]
	fn indices_follow_nearest_entries() {
		let img = image::RgbImage::from_fn(3, 1, |x, _| image::Rgb([x as u8 * 120, 0, 0]));
		let palette = Palette::from(vec![image::Rgb([250, 0, 0]), image::Rgb([0, 0, 0])]);
		assert_eq!(quantize_to_palette(&img, &palette), vec![1, 1, 0]);
	}

	#[test]
	fn remap_uses_palette_colors() {
		let img = image::RgbImage::from_fn(2, 1, |x, _| image::Rgb([x as u8 * 200, 10, 10]));
		let options = QuantizeOptions::new(1, 0, Strategy::Least).unwrap();
		let palette = quantize(&img, &options);
		assert_eq!(palette.len(), 2);
		let out = remap(&img, &palette);
		assert_eq!(out.get_pixel(0, 0), &image::Rgb([0, 10, 10]));
		assert_eq!(out.get_pixel(1, 0), &image::Rgb([200, 10, 10]));
	}

	#[test]
	fn remap_with_empty_palette_is_identity() {
		let img = image::RgbImage::from_pixel(2, 2, image::Rgb([5, 6, 7]));
		assert_eq!(remap(&img, &Palette::default()), img);
	}
}
