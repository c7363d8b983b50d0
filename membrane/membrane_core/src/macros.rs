//! Convenience macros.

/// Log an event with the given level, prefixed by the calling module.
///
/// Optional `key => value` pairs are appended as `key=value` metadata.
///
/// # Examples
///
/// ```
/// use membrane_core::log_event;
/// use membrane_core::utils::LogLevel;
///
/// log_event!(LogLevel::Debug, "Rejected prototype cycle");
///
/// log_event!(LogLevel::Trace, "Pruned identity map",
///     removed => 3,
///     remaining => 12,
/// );
/// ```
#[macro_export]
macro_rules! log_event {
    ($level:expr, $message:expr) => {
        {
            use $crate::utils::LogLevel;
            match $level {
                LogLevel::Error => log::error!("[{}] {}", module_path!(), $message),
                LogLevel::Warning => log::warn!("[{}] {}", module_path!(), $message),
                LogLevel::Info => log::info!("[{}] {}", module_path!(), $message),
                LogLevel::Debug => log::debug!("[{}] {}", module_path!(), $message),
                LogLevel::Trace => log::trace!("[{}] {}", module_path!(), $message),
            }
        }
    };

    ($level:expr, $message:expr, $($key:ident => $value:expr),+ $(,)?) => {
        {
            use $crate::utils::LogLevel;
            let metadata = vec![$(format!("{}={}", stringify!($key), $value)),+].join(" ");
            match $level {
                LogLevel::Error => log::error!("[{}] {}: {}", module_path!(), $message, metadata),
                LogLevel::Warning => log::warn!("[{}] {}: {}", module_path!(), $message, metadata),
                LogLevel::Info => log::info!("[{}] {}: {}", module_path!(), $message, metadata),
                LogLevel::Debug => log::debug!("[{}] {}: {}", module_path!(), $message, metadata),
                LogLevel::Trace => log::trace!("[{}] {}: {}", module_path!(), $message, metadata),
            }
        }
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_log_event_macro() {
        log_event!(LogLevel::Debug, "Wrapped object");
        log_event!(LogLevel::Trace, "Crossed boundary",
            from => "wet",
            to => "dry",
        );
    }
}
