fn main() {
    ldm::run_cli();
}
