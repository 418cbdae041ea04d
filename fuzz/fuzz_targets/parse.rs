#![no_main]

use libfuzzer_sys::fuzz_target;
use natparse::frontend::{FrontendConfig, ModuleIdentity, parse_module};
use natparse_core::FileKind;

fuzz_target!(|data: &[u8]| {
    // Only valid UTF-8 reaches the front end
    if let Ok(s) = std::str::from_utf8(data) {
        for kind in [FileKind::Program, FileKind::Lda, FileKind::Copycode] {
            let module = parse_module(s, ModuleIdentity::new("FUZZ", kind), None, &FrontendConfig::default());
            let _ = module.summary();
        }
    }
});
