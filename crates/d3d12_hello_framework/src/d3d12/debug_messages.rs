use tracing::debug;
use tracing::warn;
use windows::Win32::Graphics::Dxgi::*;

/// Drain the DXGI info queue into the log.
pub fn log_dxgi_debug_messages(info_queue: Option<&IDXGIInfoQueue>) {
    let Some(queue) = info_queue else {
        debug!("DXGI info queue not available");
        return;
    };

    let num_messages = unsafe { queue.GetNumStoredMessages(DXGI_DEBUG_ALL) };
    for i in 0..num_messages {
        let mut message_size: usize = 0;
        if unsafe { queue.GetMessage(DXGI_DEBUG_ALL, i, None, &mut message_size) }.is_err() {
            warn!(index = i, "failed to size DXGI debug message");
            continue;
        }

        // u64 backing keeps the message header aligned.
        let mut buffer = vec![0u64; message_size.div_ceil(std::mem::size_of::<u64>())];
        let message = buffer.as_mut_ptr() as *mut DXGI_INFO_QUEUE_MESSAGE;
        if unsafe { queue.GetMessage(DXGI_DEBUG_ALL, i, Some(message), &mut message_size) }.is_err() {
            warn!(index = i, "failed to read DXGI debug message");
            continue;
        }

        let message = unsafe { &*message };
        let description = unsafe {
            std::slice::from_raw_parts(message.pDescription, message.DescriptionByteLength)
        };
        let description = String::from_utf8_lossy(description)
            .trim_end_matches('\0')
            .trim()
            .to_string();

        warn!(
            severity = severity_name(message.Severity),
            id = message.ID,
            "DXGI: {description}"
        );
    }
    unsafe { queue.ClearStoredMessages(DXGI_DEBUG_ALL) };
}

fn severity_name(severity: DXGI_INFO_QUEUE_MESSAGE_SEVERITY) -> &'static str {
    match severity {
        DXGI_INFO_QUEUE_MESSAGE_SEVERITY_CORRUPTION => "CORRUPTION",
        DXGI_INFO_QUEUE_MESSAGE_SEVERITY_ERROR => "ERROR",
        DXGI_INFO_QUEUE_MESSAGE_SEVERITY_WARNING => "WARNING",
        DXGI_INFO_QUEUE_MESSAGE_SEVERITY_INFO => "INFO",
        DXGI_INFO_QUEUE_MESSAGE_SEVERITY_MESSAGE => "MESSAGE",
        _ => "UNKNOWN",
    }
}
