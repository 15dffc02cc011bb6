// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Tidemark

/// Wraps a diagnostic into an `Error`.
#[macro_export]
macro_rules! error {
	($diagnostic:expr) => {
		$crate::Error::new($diagnostic)
	};
}

/// Returns early with an `Error` built from the given diagnostic.
#[macro_export]
macro_rules! return_error {
	($diagnostic:expr) => {
		return Err($crate::Error::new($diagnostic))
	};
}

/// Creates an internal error diagnostic with the source location attached.
#[macro_export]
macro_rules! internal_error {
	($reason:expr) => {
		$crate::diagnostic::internal::internal_with_context($reason, file!(), line!(), column!(), module_path!())
	};
	($fmt:expr, $($arg:tt)*) => {
		$crate::diagnostic::internal::internal_with_context(
			format!($fmt, $($arg)*),
			file!(),
			line!(),
			column!(),
			module_path!()
		)
	};
}

/// Returns early with an internal error carrying the source location.
#[macro_export]
macro_rules! return_internal_error {
	($reason:expr) => {
		return Err($crate::Error::new($crate::internal_error!($reason)))
	};
	($fmt:expr, $($arg:tt)*) => {
		return Err($crate::Error::new($crate::internal_error!($fmt, $($arg)*)))
	};
}
