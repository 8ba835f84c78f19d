fn main() {
    if let Err(err) = venn_plot::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
