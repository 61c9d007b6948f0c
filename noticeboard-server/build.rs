fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Tell Cargo that if the given file changes, to rerun this build script.
    println!("cargo:rerun-if-changed=../proto/noticeboard.proto");

    tonic_build::configure()
        .build_server(true)
        .build_client(false)
        .compile_protos(&["../proto/noticeboard.proto"], &["../proto"])?;
    Ok(())
}
