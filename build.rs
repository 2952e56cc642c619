fn main() {
    println!("cargo:rerun-if-env-changed=CHATSWITCH_BOT_TOKEN");
    println!("cargo:rerun-if-env-changed=CHATSWITCH_CHAT_ID");
    println!("cargo:rerun-if-env-changed=CHATSWITCH_WIFI_SSID");
    println!("cargo:rerun-if-env-changed=CHATSWITCH_WIFI_PASSWORD");
    println!("cargo:rerun-if-env-changed=CHATSWITCH_CONTROLLER");

    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
