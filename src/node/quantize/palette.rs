pub type Color = image::Rgb<u8>;

fn abs_sub(a: u8, b: u8) -> u8 {
	(a as i16 - b as i16).abs() as u8
}

fn vec3_len_squared(a: u8, b: u8, c: u8) -> u32 {
	(a as u32 * a as u32) +
	(b as u32 * b as u32) +
	(c as u32 * c as u32)
}

/// Squared Euclidean distance between two colors in device RGB.
pub fn color_distance(a: &Color, b: &Color) -> u32 {
	vec3_len_squared(
		abs_sub(a.0[0], b.0[0]),
		abs_sub(a.0[1], b.0[1]),
		abs_sub(a.0[2], b.0[2]),
	)
}

/// An ordered list of representative colors, as produced by the quantizer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Palette {
	pub colors: Box<[Color]>,
}

impl Palette {
	pub fn len(&self) -> usize {
		self.colors.len()
	}

	pub fn is_empty(&self) -> bool {
		self.colors.is_empty()
	}

	/// Index of the entry closest to `color`; the lowest index wins ties.
	///
	/// Returns `None` for an empty palette.
	pub fn nearest(&self, color: &Color) -> Option<u32> {
		self.colors.iter()
			.enumerate()
			.map(|(ind, col)| (color_distance(color, col), ind as u32))
			.min()
			.map(|x| x.1)
	}
}

impl From<Vec<Color>> for Palette {
	fn from(v: Vec<Color>) -> Self {
		Palette { colors: v.into_boxed_slice() }
	}
}
