use std::env;

fn main() {
	println!("cargo:rerun-if-env-changed=SRZ_BUILD_TAG");

	// Packagers can stamp their builds by exporting SRZ_BUILD_TAG; plain
	// builds fall back to the crate version
	let tag = env::var("SRZ_BUILD_TAG")
		.unwrap_or_else(|_| format!("v{}", env!("CARGO_PKG_VERSION")));
	println!("cargo:rustc-env=SRZ_BUILD_TAG={tag}");
}
