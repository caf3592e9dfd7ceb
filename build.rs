fn main() {
    println!("cargo:rerun-if-env-changed=UART_RELAY_CONFIG");

    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
