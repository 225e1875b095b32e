fn main() {
    ruby_canon::cli::run();
}
