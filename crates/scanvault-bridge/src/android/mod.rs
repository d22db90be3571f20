// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Android platform bridge via JNI.
//
// Requires the Android NDK and targets `aarch64-linux-android` or
// `armv7-linux-androideabi`. Each trait method invokes the corresponding
// Android API through JNI calls into the ART runtime.
//
// ## Architecture notes
//
// Methods that can complete synchronously via JNI (permission checks,
// ContentResolver inserts, direct file copies) are fully implemented here.
//
// Methods that require `startActivityForResult` (camera capture, the
// permission prompt itself) launch the request and return
// `ScanVaultError::Bridge` explaining that the result must be collected
// through the Activity's callback. The host Activity is responsible for
// wiring that callback back into ScanVault.

#![cfg(target_os = "android")]

use std::path::{Path, PathBuf};

use jni::JNIEnv;
use jni::objects::{JObject, JString, JValue};

use scanvault_core::error::{Result, ScanVaultError};
use scanvault_core::types::{PermissionKind, PermissionStatus, PublicCollection};

use crate::traits::*;

/// Request code for the legacy write permission prompt. The host Activity
/// must recognise this in its `onRequestPermissionsResult` override.
pub const REQUEST_LEGACY_WRITE: i32 = 0x5356_0001; // "SV" + 1

/// Request code for camera capture.
pub const REQUEST_IMAGE_CAPTURE: i32 = 0x5356_0002;

/// Map any `jni::errors::Error` into `ScanVaultError::Bridge`.
fn jni_err(context: &str, e: jni::errors::Error) -> ScanVaultError {
    ScanVaultError::Bridge(format!("{context}: {e}"))
}

/// Run a closure with an attached JNI environment and the host Activity.
///
/// The `JavaVM*` and Activity `jobject` come from `ndk_context`, set up by
/// the NDK glue code; both are valid for the lifetime of the process.
fn with_env<T>(f: impl FnOnce(&mut JNIEnv<'_>, &JObject<'_>) -> Result<T>) -> Result<T> {
    let ctx = ndk_context::android_context();
    // SAFETY: `ctx.vm()` returns the `JavaVM*` set by the NDK glue code.
    let vm = unsafe { jni::JavaVM::from_raw(ctx.vm().cast()) }
        .map_err(|e| jni_err("failed to obtain JavaVM", e))?;
    let mut env = vm
        .attach_current_thread()
        .map_err(|e| jni_err("failed to attach JNI thread", e))?;

    let activity_ptr = ctx.context();
    if activity_ptr.is_null() {
        return Err(ScanVaultError::Bridge(
            "Android context is null — native activity not initialised".into(),
        ));
    }
    // SAFETY: the NDK guarantees this is a valid global jobject for the
    // hosting Activity.
    let activity = unsafe { JObject::from_raw(activity_ptr.cast()) };

    f(&mut env, &activity)
}

/// `ContentValues.put(key, value)` for string values.
fn put_string(env: &mut JNIEnv<'_>, values: &JObject<'_>, key: &str, value: &str) -> Result<()> {
    let jkey = env
        .new_string(key)
        .map_err(|e| jni_err("new_string key", e))?;
    let jvalue = env
        .new_string(value)
        .map_err(|e| jni_err("new_string value", e))?;
    env.call_method(
        values,
        "put",
        "(Ljava/lang/String;Ljava/lang/String;)V",
        &[JValue::Object(&jkey), JValue::Object(&jvalue)],
    )
    .map_err(|e| jni_err("ContentValues.put", e))?;
    Ok(())
}

/// Bridge backed by the Android SDK through JNI.
pub struct AndroidBridge {
    /// SDK_INT, read once at construction.
    api_level: i32,
    /// Folder label used for RELATIVE_PATH in scoped inserts.
    public_folder: String,
}

impl AndroidBridge {
    pub fn new() -> Self {
        let api_level = with_env(|env, _| {
            let sdk = env
                .get_static_field("android/os/Build$VERSION", "SDK_INT", "I")
                .map_err(|e| jni_err("Build.VERSION.SDK_INT", e))?
                .i()
                .map_err(|e| jni_err("SDK_INT as int", e))?;
            Ok(sdk)
        })
        .unwrap_or(0);

        tracing::info!(api_level, "Android bridge initialised");
        Self {
            api_level,
            public_folder: "ScanVault".into(),
        }
    }

    pub fn with_public_folder(mut self, folder: impl Into<String>) -> Self {
        self.public_folder = folder.into();
        self
    }
}

impl Default for AndroidBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformBridge for AndroidBridge {
    fn platform_name(&self) -> &str {
        "Android"
    }

    fn storage_capabilities(&self) -> StorageCapabilities {
        // Scoped MediaStore inserts (RELATIVE_PATH, Downloads collection)
        // arrived with API 29.
        StorageCapabilities {
            scoped_public_index: self.api_level >= 29,
        }
    }
}

impl NativeCapture for AndroidBridge {
    fn capture_image(&self) -> Result<Option<PathBuf>> {
        with_env(|env, activity| {
            let action = env
                .new_string("android.media.action.IMAGE_CAPTURE")
                .map_err(|e| jni_err("new_string action", e))?;
            let intent = env
                .new_object(
                    "android/content/Intent",
                    "(Ljava/lang/String;)V",
                    &[JValue::Object(&action)],
                )
                .map_err(|e| jni_err("new Intent", e))?;
            env.call_method(
                activity,
                "startActivityForResult",
                "(Landroid/content/Intent;I)V",
                &[JValue::Object(&intent), JValue::Int(REQUEST_IMAGE_CAPTURE)],
            )
            .map_err(|e| jni_err("startActivityForResult", e))?;

            Err(ScanVaultError::Bridge(
                "capture launched — collect the image path in onActivityResult and re-enter the save flow".into(),
            ))
        })
    }
}

impl NativePermissions for AndroidBridge {
    fn check_or_request(&self, kind: PermissionKind) -> Result<PermissionStatus> {
        let permission = match kind {
            PermissionKind::LegacyWrite => "android.permission.WRITE_EXTERNAL_STORAGE",
        };

        with_env(|env, activity| {
            let jperm = env
                .new_string(permission)
                .map_err(|e| jni_err("new_string permission", e))?;

            // PackageManager.PERMISSION_GRANTED == 0
            let state = env
                .call_method(
                    activity,
                    "checkSelfPermission",
                    "(Ljava/lang/String;)I",
                    &[JValue::Object(&jperm)],
                )
                .map_err(|e| jni_err("checkSelfPermission", e))?
                .i()
                .map_err(|e| jni_err("permission state as int", e))?;

            if state == 0 {
                return Ok(PermissionStatus::Granted);
            }

            // Not granted: launch the prompt. The grant/deny result arrives
            // via onRequestPermissionsResult on the host Activity, so this
            // call reports Denied for the current attempt.
            let perm_array = env
                .new_object_array(1, "java/lang/String", &jperm)
                .map_err(|e| jni_err("new permission array", e))?;
            env.call_method(
                activity,
                "requestPermissions",
                "([Ljava/lang/String;I)V",
                &[
                    JValue::Object(&JObject::from(perm_array)),
                    JValue::Int(REQUEST_LEGACY_WRITE),
                ],
            )
            .map_err(|e| jni_err("requestPermissions", e))?;

            tracing::info!(permission, "permission prompt launched");
            Ok(PermissionStatus::Denied)
        })
    }
}

impl NativeMediaStore for AndroidBridge {
    fn copy_into_public_index(
        &self,
        source: &Path,
        display_name: &str,
        collection: PublicCollection,
        mime_type: &str,
    ) -> Result<String> {
        let bytes = std::fs::read(source)?;
        let relative_path = match collection {
            PublicCollection::Photos => format!("Pictures/{}", self.public_folder),
            PublicCollection::Downloads => format!("Download/{}", self.public_folder),
        };

        with_env(|env, activity| {
            let values = env
                .new_object("android/content/ContentValues", "()V", &[])
                .map_err(|e| jni_err("new ContentValues", e))?;
            put_string(env, &values, "_display_name", display_name)?;
            put_string(env, &values, "mime_type", mime_type)?;
            put_string(env, &values, "relative_path", &relative_path)?;

            let collection_class = match collection {
                PublicCollection::Photos => "android/provider/MediaStore$Images$Media",
                PublicCollection::Downloads => "android/provider/MediaStore$Downloads",
            };
            let collection_uri = env
                .get_static_field(collection_class, "EXTERNAL_CONTENT_URI", "Landroid/net/Uri;")
                .map_err(|e| jni_err("EXTERNAL_CONTENT_URI", e))?
                .l()
                .map_err(|e| jni_err("collection uri as object", e))?;

            let resolver = env
                .call_method(
                    activity,
                    "getContentResolver",
                    "()Landroid/content/ContentResolver;",
                    &[],
                )
                .map_err(|e| jni_err("getContentResolver", e))?
                .l()
                .map_err(|e| jni_err("resolver as object", e))?;

            let uri = env
                .call_method(
                    &resolver,
                    "insert",
                    "(Landroid/net/Uri;Landroid/content/ContentValues;)Landroid/net/Uri;",
                    &[JValue::Object(&collection_uri), JValue::Object(&values)],
                )
                .map_err(|e| jni_err("ContentResolver.insert", e))?
                .l()
                .map_err(|e| jni_err("inserted uri as object", e))?;
            if uri.is_null() {
                return Err(ScanVaultError::Bridge(
                    "MediaStore insert returned null — duplicate name or collection unavailable".into(),
                ));
            }

            let stream = env
                .call_method(
                    &resolver,
                    "openOutputStream",
                    "(Landroid/net/Uri;)Ljava/io/OutputStream;",
                    &[JValue::Object(&uri)],
                )
                .map_err(|e| jni_err("openOutputStream", e))?
                .l()
                .map_err(|e| jni_err("stream as object", e))?;

            let jbytes = env
                .byte_array_from_slice(&bytes)
                .map_err(|e| jni_err("byte_array_from_slice", e))?;
            env.call_method(
                &stream,
                "write",
                "([B)V",
                &[JValue::Object(&JObject::from(jbytes))],
            )
            .map_err(|e| jni_err("OutputStream.write", e))?;
            env.call_method(&stream, "close", "()V", &[])
                .map_err(|e| jni_err("OutputStream.close", e))?;

            let jstr = env
                .call_method(&uri, "toString", "()Ljava/lang/String;", &[])
                .map_err(|e| jni_err("Uri.toString", e))?
                .l()
                .map_err(|e| jni_err("uri string as object", e))?;
            let locator: String = env
                .get_string(&JString::from(jstr))
                .map_err(|e| jni_err("get_string locator", e))?
                .into();

            tracing::info!(%locator, "artifact registered with public index");
            Ok(locator)
        })
    }

    fn copy_to_legacy_public_directory(
        &self,
        source: &Path,
        display_name: &str,
    ) -> Result<PathBuf> {
        let downloads = with_env(|env, _| {
            let dir_name = env
                .get_static_field(
                    "android/os/Environment",
                    "DIRECTORY_DOWNLOADS",
                    "Ljava/lang/String;",
                )
                .map_err(|e| jni_err("DIRECTORY_DOWNLOADS", e))?
                .l()
                .map_err(|e| jni_err("directory name as object", e))?;
            let dir = env
                .call_static_method(
                    "android/os/Environment",
                    "getExternalStoragePublicDirectory",
                    "(Ljava/lang/String;)Ljava/io/File;",
                    &[JValue::Object(&dir_name)],
                )
                .map_err(|e| jni_err("getExternalStoragePublicDirectory", e))?
                .l()
                .map_err(|e| jni_err("downloads dir as object", e))?;
            let jpath = env
                .call_method(&dir, "getAbsolutePath", "()Ljava/lang/String;", &[])
                .map_err(|e| jni_err("File.getAbsolutePath", e))?
                .l()
                .map_err(|e| jni_err("path as object", e))?;
            let path: String = env
                .get_string(&JString::from(jpath))
                .map_err(|e| jni_err("get_string path", e))?
                .into();
            Ok(PathBuf::from(path))
        })?;

        let destination = downloads.join(display_name);
        if destination.exists() {
            std::fs::remove_file(&destination)?;
        }
        std::fs::copy(source, &destination)?;

        tracing::info!(path = %destination.display(), "artifact copied to legacy downloads");
        Ok(destination)
    }
}
