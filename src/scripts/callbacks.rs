//! Unity message methods the engine invokes by name.

/// Invoked every frame (or every physics step / GUI event).
pub const HOT_PATH_CALLBACKS: &[&str] = &["Update", "LateUpdate", "FixedUpdate", "OnGUI"];

/// Lifecycle messages that cost a dispatch even when empty.
pub const LIFECYCLE_CALLBACKS: &[&str] = &[
    "Awake",
    "Start",
    "OnEnable",
    "OnDisable",
    "OnDestroy",
    "OnValidate",
    "OnApplicationQuit",
    "OnBecameVisible",
    "OnBecameInvisible",
];

pub fn is_hot_path(name: &str) -> bool {
    HOT_PATH_CALLBACKS.contains(&name)
}

pub fn is_unity_callback(name: &str) -> bool {
    is_hot_path(name) || LIFECYCLE_CALLBACKS.contains(&name)
}
