#![no_main]

use libfuzzer_sys::fuzz_target;
use zedws_types::LaunchTarget;

fuzz_target!(|data: &[u8]| {
    // Payloads come back from the host verbatim; parsing must never panic
    if let Ok(s) = std::str::from_utf8(data)
        && let Ok(target) = serde_json::from_str::<LaunchTarget>(s)
    {
        let _ = target.command("zed", "wsl");
    }
});
