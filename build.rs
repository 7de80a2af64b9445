// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::env;
use std::{
    fs::File,
    path::{Path, PathBuf},
};

// Use the "built" crate to generate some useful build-time information,
// including the git hash and compiler version.
fn write_built(out_dir: &Path) {
    built::write_built_file_with_opts(
        Some(env::var("CARGO_MANIFEST_DIR").unwrap().as_ref()),
        &out_dir.join("built.rs"),
    )
    .expect("Failed to acquire build-time information");
}

fn main() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR env. variable not defined!"));

    // Release builds always get a fresh build stamp, so the reported build
    // time is never stale.
    if env::var("DEBUG").unwrap() == "false" {
        let p = Path::new(&out_dir).join("rebuild_stamp");
        File::create(&p).unwrap();
        println!("cargo:rerun-if-changed={}", p.display());
    }

    write_built(&out_dir);
}
