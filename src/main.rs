fn main() {
    gauntlet::cli::run();
}
