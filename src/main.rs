fn main() {
    uprocess::cli::run();
}
