fn main() {
    println!("cargo:rerun-if-changed=web");
    println!("cargo:rerun-if-env-changed=PINBOARD_WIFI_SSID");
    println!("cargo:rerun-if-env-changed=PINBOARD_WIFI_PASSWORD");

    // Exposes the ESP-IDF sysenv (MCU cfg such as `esp32s3`) to this crate.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
