use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// pdfium-binaries release matching the `pdfium_7543` feature of pdfium-render
const PDFIUM_RELEASE: &str = "chromium/7543";

/// Platform naming used by the pdfium-binaries archives
struct PdfiumTarget {
    platform: &'static str,
    arch: &'static str,
    lib_name: &'static str,
}

impl PdfiumTarget {
    fn from_triple(triple: &str) -> Option<Self> {
        let arm = triple.contains("aarch64");
        let target = if triple.contains("apple") {
            Self {
                platform: "mac",
                arch: if arm { "arm64" } else { "x64" },
                lib_name: "libpdfium.dylib",
            }
        } else if triple.contains("linux") {
            Self {
                platform: "linux",
                arch: if arm { "arm64" } else { "x64" },
                lib_name: "libpdfium.so",
            }
        } else if triple.contains("windows") {
            let arch = if arm {
                "arm64"
            } else if triple.contains("i686") {
                "x86"
            } else {
                "x64"
            };
            Self {
                platform: "win",
                arch,
                lib_name: "pdfium.dll",
            }
        } else {
            return None;
        };
        Some(target)
    }

    fn download_url(&self) -> String {
        format!(
            "https://github.com/bblanchon/pdfium-binaries/releases/download/{}/pdfium-{}-{}.tgz",
            PDFIUM_RELEASE, self.platform, self.arch
        )
    }
}

fn main() {
    if env::var("CARGO_FEATURE_PDF_VIEWER").is_err() {
        return;
    }

    let triple = env::var("TARGET").expect("cargo sets TARGET");
    let Some(target) = PdfiumTarget::from_triple(&triple) else {
        println!("cargo:warning=No prebuilt pdfium for {}", triple);
        return;
    };

    // vendor/pdfium at the workspace root, two levels above this crate
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("cargo sets CARGO_MANIFEST_DIR"));
    let pdfium_dir = manifest_dir
        .ancestors()
        .nth(2)
        .expect("crate lives in <workspace>/crates/")
        .join("vendor")
        .join("pdfium");
    let lib_dir = pdfium_dir.join("lib");
    let lib_path = lib_dir.join(target.lib_name);

    if !lib_path.exists() {
        install(&target, &pdfium_dir, &lib_path);
    }

    if target.platform == "mac" {
        set_macos_install_name(&lib_path);
    }

    println!("cargo:rustc-link-search=native={}", lib_dir.display());
    println!("cargo:rustc-link-lib=dylib=pdfium");
    if target.platform != "win" {
        println!("cargo:rustc-link-arg=-Wl,-rpath,{}", lib_dir.display());
    }
    println!("cargo:include={}", pdfium_dir.join("include").display());
    println!("cargo:rerun-if-changed={}", lib_dir.display());
}

fn install(target: &PdfiumTarget, pdfium_dir: &Path, lib_path: &Path) {
    let url = target.download_url();
    println!("cargo:warning=Downloading pdfium from {}", url);

    fs::create_dir_all(pdfium_dir).expect("Failed to create vendor/pdfium");

    let archive = env::temp_dir().join(format!("pdfium-{}-{}.tgz", target.platform, target.arch));
    download(&url, &archive);
    unpack(&archive, pdfium_dir);
    let _ = fs::remove_file(&archive);

    if !lib_path.exists() {
        panic!("pdfium archive did not contain {}", lib_path.display());
    }
    println!("cargo:warning=pdfium installed to {}", pdfium_dir.display());
}

fn download(url: &str, dest: &Path) {
    let response = ureq::get(url)
        .call()
        .unwrap_or_else(|e| panic!("Failed to download {}: {}", url, e));

    let mut file = fs::File::create(dest).expect("Failed to create archive file");
    std::io::copy(&mut response.into_reader(), &mut file).expect("Failed to write archive");
}

fn unpack(archive: &Path, dest: &Path) {
    let file = fs::File::open(archive).expect("Failed to open archive");
    tar::Archive::new(flate2::read::GzDecoder::new(file))
        .unpack(dest)
        .expect("Failed to extract archive");
}

/// Point the dylib's install name at @rpath so the binary finds it
fn set_macos_install_name(lib_path: &Path) {
    let result = std::process::Command::new("install_name_tool")
        .arg("-id")
        .arg("@rpath/libpdfium.dylib")
        .arg(lib_path)
        .output();

    match result {
        Ok(output) if output.status.success() => {}
        Ok(output) => println!(
            "cargo:warning=install_name_tool failed: {}",
            String::from_utf8_lossy(&output.stderr)
        ),
        Err(e) => println!("cargo:warning=install_name_tool not available: {}", e),
    }
}
