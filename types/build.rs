fn main() {
    println!("cargo:rerun-if-changed=proto/kafka.proto");
    tonic_prost_build::configure()
        .compile_protos(&["proto/kafka.proto"], &["proto/"])
        .expect("Failed to compile proto/kafka.proto");
}
