//--> Imports <--

use std::{
	ffi::OsString,
	fs,
	io,
	path::{
		Path,
		PathBuf,
	},
	process,
};

use clap::{
	Arg,
	ArgAction,
	ArgMatches,
	Command,
};

use tracing::Level;

use tisasm::{
	Error,
	Result,
};

//--> Functions <--

fn main() {
	let args = {
		clap::command!()
		.long_about(
			"tisasm is a two-pass cross-assembler for the TIS toy CPU, an 8-bit machine with a 16-bit address space.\n\n\
			It turns assembly source into a raw load image, turns load images back into annotated assembly, \
			and can show where a load image ends up in memory."
		)
		.arg_required_else_help(true)
		.subcommand_required(true)
		.arg(
			Arg::new("verbose")
			.short('v')
			.long("verbose")
			.global(true)
			.action(ArgAction::Count)
			.help("Outputs additional information while working. Repeat for more detail.")
		)
		.subcommands([
			Command::new("assemble")
			.about("Assembles a source file into a load image.")
			.args([
				input_arg("Path to the assembly source file."),
				{
					Arg::new("output")
					.short('o')
					.long("out")
					.value_name("OUTPATH")
					.value_parser(clap::value_parser!(PathBuf))
					.help("Specifies a custom path for the load image. By default, the input path with its '.asm' extension replaced by '.bin'.")
				},
				{
					Arg::new("listing")
					.short('l')
					.long("list")
					.value_name("LISTPATH")
					.value_parser(clap::value_parser!(PathBuf))
					.help("Specifies a path to write the resolved label addresses to. By default, no listing is written.")
				},
			]),
			Command::new("disassemble")
			.about("Turns a load image back into annotated assembly.")
			.args([
				input_arg("Path to the load image."),
				{
					Arg::new("output")
					.short('o')
					.long("out")
					.value_name("OUTPATH")
					.value_parser(clap::value_parser!(PathBuf))
					.help("Specifies a path to write the assembly to. By default, it is printed.")
				},
			]),
			Command::new("dump")
			.about("Loads a load image into memory and prints a hex dump of it.")
			.args([
				input_arg("Path to the load image."),
				{
					Arg::new("nonzero")
					.long("nonzero")
					.help("Only prints rows that contain something other than zero.")
				},
			]),
		])
		.get_matches()
	};

	init_logging(args.get_count("verbose"));

	// A subcommand and its input are required, so unwrapping is okay here.
	let (name, sub_args) = args.subcommand().unwrap();
	let input = sub_args.get_one::<PathBuf>("input").unwrap().clone();

	let result = match name {
		"assemble" => assemble(&input, sub_args),
		"disassemble" => disassemble(&input, sub_args),
		"dump" => dump(&input, sub_args),
		_ => unreachable!(),
	};

	if let Err(err) = result {
		eprintln!("ERR: {}", err);
		process::exit(if err.is_io() { 1 } else { 2 });
	}
}

fn input_arg(help: &'static str) -> Arg<'static> {
	Arg::new("input")
	.value_name("INPATH")
	.value_parser(clap::value_parser!(PathBuf))
	.required(true)
	.help(help)
}

fn init_logging(verbosity: u8) {
	let level = match verbosity {
		0 => Level::WARN,
		1 => Level::INFO,
		2 => Level::DEBUG,
		_ => Level::TRACE,
	};

	tracing_subscriber::fmt()
		.with_max_level(level)
		.with_writer(io::stderr)
		.without_time()
		.init();
}

fn assemble(input: &Path, args: &ArgMatches) -> Result<()> {
	let source = fs::read_to_string(input).map_err(|e| io_error(input, e))?;

	let (image, labels) = tisasm::assemble_with_labels(&source).map_err(|e| e.with_file(input))?;

	let output_path = match args.get_one::<PathBuf>("output") {
		Some(path) => path.clone(),
		None => default_output_path(input)
	};

	fs::write(&output_path, &image).map_err(|e| io_error(&output_path, e))?;
	tracing::info!("assembled {} bytes into '{}'", image.len(), output_path.display());

	if let Some(path) = args.get_one::<PathBuf>("listing") {
		fs::write(path, labels.to_string()).map_err(|e| io_error(path, e))?;
		tracing::info!("wrote {} labels to '{}'", labels.len(), path.display());
	}

	Ok(())
}

fn disassemble(input: &Path, args: &ArgMatches) -> Result<()> {
	let image = fs::read(input).map_err(|e| io_error(input, e))?;

	let text = tisasm::disassemble(&image).map_err(|e| e.with_file(input))?;

	match args.get_one::<PathBuf>("output") {
		Some(path) => {
			fs::write(path, &text).map_err(|e| io_error(path, e))?;
			tracing::info!("disassembled '{}' into '{}'", input.display(), path.display());
		},
		None => print!("{}", text)
	}

	Ok(())
}

fn dump(input: &Path, args: &ArgMatches) -> Result<()> {
	let image = fs::read(input).map_err(|e| io_error(input, e))?;

	let memory = tisasm::load(&image).map_err(|e| e.with_file(input))?;

	print!("{}", memory.dump(args.contains_id("nonzero")));
	Ok(())
}

/// `prog.asm` becomes `prog.bin`; anything else gets `.bin` appended.
fn default_output_path(input: &Path) -> PathBuf {
	match input.extension() {
		Some(ext) if ext == "asm" => input.with_extension("bin"),
		_ => {
			let mut path = OsString::from(input.as_os_str());
			path.push(".bin");
			PathBuf::from(path)
		}
	}
}

fn io_error(path: &Path, err: io::Error) -> Error { Error::from(err).with_file(path) }
