fn main() {
    labwise_lib::run()
}
