/// Builds the gRPC client and server code for the `route_guide.proto`
/// definition using `tonic-prost-build`.
///
/// Both halves are generated: the binary only uses the client, while the
/// server trait backs the in-process test double.
///
/// # Files and Paths
///
/// - Proto file: `proto/route_guide.proto`
/// - Includes: `proto/`
///
/// # Output
///
/// Generated code is included via:
///
/// ```rust,ignore
/// pub mod proto {
///     tonic::include_proto!("routeguide");
/// }
/// ```
fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=proto/route_guide.proto");

    tonic_prost_build::configure()
        .build_client(true)
        .build_server(true)
        .compile_protos(&["proto/route_guide.proto"], &["proto"])?;

    Ok(())
}
