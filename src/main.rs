fn main() {
    if let Err(err) = referral_report::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
