// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// ScanVault — Native platform bridge abstractions.
//
// Defines the collaborator traits the engine talks to (capture device,
// storage permission layer, public media store) and the platform dispatch
// logic. High-level code interacts with Android (ART/JNI) APIs through this
// unified interface; other platforms get the stub.

pub mod traits;

#[cfg(target_os = "android")]
pub mod android;

#[cfg(not(target_os = "android"))]
pub mod stub;

/// Retrieves the bridge implementation for the target operating system.
pub fn platform_bridge() -> Box<dyn traits::PlatformBridge> {
    #[cfg(target_os = "android")]
    {
        // Android: uses `jni-rs` to invoke methods on the JVM/ART.
        Box::new(android::AndroidBridge::new())
    }
    #[cfg(not(target_os = "android"))]
    {
        // Desktop/CI: mock implementation to allow non-native builds.
        Box::new(stub::StubBridge)
    }
}
