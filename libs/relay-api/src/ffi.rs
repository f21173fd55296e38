use crate::config::{ConfigParam, ConfigValues};
use crate::error::PluginError;

/// Current ABI version. Host checks this against plugin's `qs_abi_version()`.
pub const QS_ABI_VERSION: u32 = 1;

/// FFI return struct from `qs_create_*` functions.
#[repr(C)]
pub struct PluginCreateResult {
    /// Pointer to the created plugin object (Box<Box<dyn Trait>>).
    /// Null if creation failed.
    pub plugin_ptr: *mut (),
    /// Pointer to a heap-allocated error string.
    /// Null if creation succeeded.
    pub error_ptr: *mut u8,
    pub error_len: usize,
}

pub type AbiVersionFn = unsafe extern "C" fn() -> u32;

/// Returns a pointer to a boxed `Vec<ConfigParam>`. Caller takes ownership.
pub type ConfigParamsFn = unsafe extern "C" fn() -> *mut ();

/// Takes a pointer to host-owned `ConfigValues` (plugin borrows, does not own).
pub type CreatePluginFn = unsafe extern "C" fn(*const ()) -> PluginCreateResult;

pub type DestroyPluginFn = unsafe extern "C" fn(*mut ());

pub fn plugin_ok<T: ?Sized>(plugin: Box<Box<T>>) -> PluginCreateResult {
    PluginCreateResult {
        plugin_ptr: Box::into_raw(plugin) as *mut (),
        error_ptr: std::ptr::null_mut(),
        error_len: 0,
    }
}

pub fn plugin_err(msg: &str) -> PluginCreateResult {
    let bytes = msg.as_bytes().to_vec().into_boxed_slice();
    let len = bytes.len();
    PluginCreateResult {
        plugin_ptr: std::ptr::null_mut(),
        error_ptr: Box::into_raw(bytes) as *mut u8,
        error_len: len,
    }
}

/// Host will reconstruct as `Box<Vec<ConfigParam>>` and take ownership.
pub fn config_params_ok(params: Vec<ConfigParam>) -> *mut () {
    Box::into_raw(Box::new(params)) as *mut ()
}

/// # Safety
///
/// `ptr` must be a valid pointer to a `ConfigValues` value owned by the host.
pub unsafe fn config_from_ptr<'a>(ptr: *const ()) -> &'a ConfigValues {
    unsafe { &*(ptr as *const ConfigValues) }
}

/// Host side: take ownership of the params returned by `qs_config_params`.
///
/// # Safety
///
/// `ptr` must come from [`config_params_ok`] and not have been taken before.
pub unsafe fn take_config_params(ptr: *mut ()) -> Vec<ConfigParam> {
    if ptr.is_null() {
        return Vec::new();
    }
    unsafe { *Box::from_raw(ptr as *mut Vec<ConfigParam>) }
}

/// Host side: unpack a `qs_create_*` result, freeing the error string if any.
///
/// # Safety
///
/// `result` must come from [`plugin_ok`] or [`plugin_err`] and be unpacked once.
pub unsafe fn take_create_result(result: PluginCreateResult) -> Result<*mut (), PluginError> {
    if !result.plugin_ptr.is_null() {
        return Ok(result.plugin_ptr);
    }
    if result.error_ptr.is_null() || result.error_len == 0 {
        return Err(PluginError::config("plugin create failed: unknown error"));
    }
    let bytes = unsafe {
        Box::from_raw(std::ptr::slice_from_raw_parts_mut(
            result.error_ptr,
            result.error_len,
        ))
    };
    Err(PluginError::config(format!(
        "plugin create failed: {}",
        String::from_utf8_lossy(&bytes)
    )))
}

/// Macro: export `qs_abi_version` function.
#[macro_export]
macro_rules! qs_abi_version_fn {
    () => {
        #[unsafe(no_mangle)]
        pub extern "C" fn qs_abi_version() -> u32 {
            $crate::ffi::QS_ABI_VERSION
        }
    };
}

/// Macro: export `qs_config_params` function.
///
/// - `qs_config_params_fn!(MyConfigType)` — uses `MyConfigType::config_params()` from derive.
/// - `qs_config_params_fn!([])` — manual list.
#[macro_export]
macro_rules! qs_config_params_fn {
    ([$($param:expr),* $(,)?]) => {
        #[unsafe(no_mangle)]
        pub extern "C" fn qs_config_params() -> *mut () {
            $crate::ffi::config_params_ok(vec![$($param),*])
        }
    };
    ($config_type:ty) => {
        #[unsafe(no_mangle)]
        pub extern "C" fn qs_config_params() -> *mut () {
            $crate::ffi::config_params_ok(<$config_type>::config_params())
        }
    };
}

/// Macro: export `qs_destroy_*` function for a trait object.
#[macro_export]
macro_rules! qs_destroy_fn {
    ($name:ident, $trait_ty:path) => {
        /// # Safety
        ///
        /// `ptr` must come from the matching `qs_create_*` and be destroyed once.
        #[unsafe(no_mangle)]
        pub unsafe extern "C" fn $name(ptr: *mut ()) {
            if !ptr.is_null() {
                let _ = unsafe { Box::from_raw(ptr as *mut Box<dyn $trait_ty>) };
            }
        }
    };
}
