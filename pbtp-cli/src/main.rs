use hidapi::{HidApi, HidDevice};
use pbtp::utils::{dump_firmware, flash_firmware};
use pbtp::{FIRMWARE_SIZE, MIN_REQUEST_SIZE, USB_PRODUCT_ID, USB_VENDOR_ID};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::thread;
use std::time::Duration;
use structopt::StructOpt;

/// Last chance for the operator to abort before the device is written.
const ABORT_WINDOW: Duration = Duration::from_secs(5);

fn main() {
    pretty_env_logger::init();

    let args = Opt::from_args();

    if args.request_size < MIN_REQUEST_SIZE {
        eprintln!(
            "Invalid request size: must be at least {} bytes",
            MIN_REQUEST_SIZE
        );
        process::exit(1);
    }
    println!("Request size is {}", args.request_size);

    let code = match (&args.read, &args.write) {
        (Some(path), None) => read_fw(path, args.request_size),
        (None, Some(path)) => write_fw(path, args.request_size),
        _ => {
            eprintln!("Neither read or write are specified!");
            1
        }
    };

    process::exit(code);
}

fn read_fw(path: &Path, request_size: usize) -> i32 {
    // open the output first so a bad path fails before the device is touched
    let mut out = match File::create(path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Failed to open {} for write: {}", path.display(), e);
            return 1;
        }
    };

    let d = match open_device() {
        Some(d) => d,
        None => return 1,
    };

    let image = match dump_firmware(&d, request_size) {
        Ok(image) => image,
        Err(e) => {
            eprintln!("Failed to read firmware: {:?}", e);
            return 1;
        }
    };
    log::debug!("read {} bytes from the device", image.len());

    if let Err(e) = out.write_all(&image) {
        eprintln!("Failed to write {}: {}", path.display(), e);
        return 1;
    }

    0
}

fn write_fw(path: &Path, request_size: usize) -> i32 {
    let image = match load_image(path) {
        Ok(image) => image,
        Err(message) => {
            eprintln!("{}", message);
            return 1;
        }
    };
    log::debug!("loaded {} bytes from {}", image.len(), path.display());

    let d = match open_device() {
        Some(d) => d,
        None => return 1,
    };

    println!("You have {} seconds to press CTRL+C", ABORT_WINDOW.as_secs());
    thread::sleep(ABORT_WINDOW);

    match flash_firmware(&d, &image, request_size) {
        Ok(()) => {
            println!("Success");
            0
        }
        Err(e) => {
            eprintln!("Failed to write firmware: {:?}", e);
            1
        }
    }
}

/// The firmware image is a raw blob of exactly 14k; anything else on disk is
/// a broken image and is refused before the device is opened.
fn load_image(path: &Path) -> Result<Vec<u8>, String> {
    let mut f = File::open(path)
        .map_err(|e| format!("Failed to open {} for read: {}", path.display(), e))?;

    let mut image = Vec::new();
    f.read_to_end(&mut image)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

    if image.len() != FIRMWARE_SIZE {
        return Err(format!(
            "Short firmware: {} bytes, expected {}",
            image.len(),
            FIRMWARE_SIZE
        ));
    }

    Ok(image)
}

fn open_device() -> Option<HidDevice> {
    let api = match HidApi::new() {
        Ok(api) => api,
        Err(e) => {
            eprintln!("Couldn't find system usb: {}", e);
            return None;
        }
    };

    match api.open(USB_VENDOR_ID, USB_PRODUCT_ID) {
        Ok(d) => {
            println!(
                "found {:?} {:?}",
                d.get_manufacturer_string(),
                d.get_product_string()
            );
            Some(d)
        }
        Err(e) => {
            eprintln!("Failed to open device: {}", e);
            None
        }
    }
}

fn parse_size(input: &str) -> Result<usize, std::num::ParseIntError> {
    if input.starts_with("0x") {
        usize::from_str_radix(&input[2..], 16)
    } else {
        input.parse::<usize>()
    }
}

#[derive(Debug, StructOpt)]
#[structopt(name = "pbtp", about = "Pinebook touchpad firmware writer")]
struct Opt {
    /// Write firmware from file to the device
    #[structopt(
        short = "w",
        name = "write",
        long = "write",
        parse(from_os_str),
        conflicts_with = "read"
    )]
    write: Option<PathBuf>,

    /// Read firmware from device to the file
    #[structopt(short = "r", name = "read", long = "read", parse(from_os_str))]
    read: Option<PathBuf>,

    /// Feature request size in bytes (see documentation), specific to the
    /// device and firmware pairing
    #[structopt(short = "s", long = "request-size", parse(try_from_str = parse_size))]
    request_size: usize,
}
