fn main() {
    audio_notifier_lib::run()
}
