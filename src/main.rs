use image::error::ImageError;

use octree_quant::{quantize, remap, QuantizeOptions, Strategy};

use tracing_subscriber::EnvFilter;

/// Helper function for `main`.
fn error_exit(msg: &str, code: i32) -> ! {
	tracing::error!("{}", msg);
	std::process::exit(code)
}

fn image_error_exit(e: ImageError, reading: bool) -> ! {
	let (msg, code) = match e {
		ImageError::Decoding(_) => ("Invalid image data", 4),
		ImageError::Limits(_) => ("Computation limits exceeded", 5),
		ImageError::IoError(_) if reading => ("File not found or could not be read", 3),
		ImageError::IoError(_) => ("Could not save output", 3),
		ImageError::Unsupported(_) if !reading => ("Unsupported output format", 2),
		_ => ("An error occurred", 10)
	};
	error_exit(msg, code)
}

/// `clap`-based CLI for reducing an image to an adaptive palette.
///
/// May exit process with status code if there are errors:
///
/// 1: `clap` error
///
/// 2: invalid arguments
///
/// 3: file I/O issues
///
/// 4: invalid image data
///
/// 5: computation limits exceeded
///
/// 10: other, potentially unknown error
fn main() {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env()
			.unwrap_or_else(|_| EnvFilter::new("info")))
		.with_writer(std::io::stderr)
		.init();

	let clap_matches = clap::App::new("octree_quant")
		.version("0.1.0")
		.author("vkcz")
		.about("Reduces an image to a palette chosen by an adaptive octree.")
		.arg_from_usage("-d, --depth=[N] 'Maximum depth of the tree, from 0 to 7; defaults to 7'")
		.arg_from_usage("-s, --size=[N] 'Number of colors to use; defaults to 64'")
		.arg_from_usage("-m, --strategy=[S] 'LEAST or MOST merge strategy; defaults to LEAST'")
		.arg_from_usage("<INPUT> 'Path to input file'")
		.arg_from_usage("[OUTPUT] 'Path to output file; defaults to INPUT with a .quant.png file extension'")
		.get_matches();

	let defaults = QuantizeOptions::default();
	let (depth, size, strategy) = (
		match clap_matches.value_of("depth").map(str::parse::<u8>) {
			None => defaults.max_depth(),
			Some(Ok(n)) => n,
			Some(Err(_)) => error_exit("Non-numeric value for depth", 2)
		},
		match clap_matches.value_of("size").map(str::parse::<usize>) {
			None => defaults.size(),
			Some(Ok(n)) => n,
			Some(Err(_)) => error_exit("Non-numeric value for size", 2)
		},
		match clap_matches.value_of("strategy").map(str::parse::<Strategy>) {
			None => defaults.strategy(),
			Some(Ok(s)) => s,
			Some(Err(e)) => error_exit(&e.to_string(), 2)
		}
	);
	let options = match QuantizeOptions::new(size, depth, strategy) {
		Ok(o) => o,
		Err(e) => error_exit(&e.to_string(), 2)
	};

	// `INPUT` is required, so clap has already rejected a missing one.
	let input_path = clap_matches.value_of("INPUT").unwrap_or_default();
	let source = match image::open(input_path) {
		Ok(i) => i,
		Err(e) => image_error_exit(e, true)
	};

	let palette = quantize(&source, &options);
	tracing::info!(colors = palette.len(), ?strategy, "Generated palette");
	let output = remap(&source, &palette);

	let output_path = clap_matches.value_of("OUTPUT")
		.map(str::to_string)
		.unwrap_or_else(|| input_path.rsplitn(2, '.').last().unwrap_or(input_path).to_string() + ".quant.png");
	if let Err(e) = output.save(&output_path) {
		image_error_exit(e, false)
	}
}
