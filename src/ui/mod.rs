pub mod progress;

pub fn print_banner() {
    eprintln!("pocsag-tx");
}
