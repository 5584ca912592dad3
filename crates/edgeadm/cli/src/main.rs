use edgeadm::output::print_error;

fn main() {
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            print_error(&format!("cannot start runtime: {}", e));
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(edgeadm::run()) {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}
