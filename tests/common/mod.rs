// Shared fixtures for unitymap integration tests
#![allow(dead_code)]

use indoc::indoc;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Writes a throwaway Unity project into a temporary directory.
pub struct UnityProjectBuilder {
    dir: TempDir,
}

impl Default for UnityProjectBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl UnityProjectBuilder {
    /// A project with the two marker folders and nothing else.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        fs::create_dir_all(dir.path().join("Assets")).expect("Failed to create Assets");
        fs::create_dir_all(dir.path().join("ProjectSettings"))
            .expect("Failed to create ProjectSettings");
        Self { dir }
    }

    pub fn folder(self, relative: &str) -> Self {
        fs::create_dir_all(self.dir.path().join(relative)).expect("Failed to create folder");
        self
    }

    pub fn file(self, relative: &str, contents: impl AsRef<[u8]>) -> Self {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent folder");
        }
        fs::write(&path, contents).expect("Failed to write fixture file");
        self
    }

    /// A file of `size` zero bytes.
    pub fn sized_file(self, relative: &str, size: usize) -> Self {
        self.file(relative, vec![0u8; size])
    }

    pub fn script(self, relative: &str, source: &str) -> Self {
        self.file(relative, source)
    }

    pub fn asmdef(self, relative: &str, name: &str, references: &[&str]) -> Self {
        let refs: Vec<String> = references.iter().map(|r| format!("\"{}\"", r)).collect();
        let json = format!(
            "{{\n  \"name\": \"{}\",\n  \"references\": [{}]\n}}\n",
            name,
            refs.join(", ")
        );
        self.file(relative, json)
    }

    pub fn package_manifest(self, json: &str) -> Self {
        self.file("Packages/manifest.json", json)
    }

    pub fn build(self) -> TempDir {
        self.dir
    }
}

pub const CHAIN_SOURCE: &str = indoc! {r#"
    namespace Game
    {
        public class ClassA : ClassB
        {
            public void Run() { }
        }

        public class ClassB : ClassC
        {
        }

        public class ClassC
        {
        }
    }
"#};

pub const PLAYER_SOURCE: &str = indoc! {r#"
    using UnityEngine;

    public class PlayerController : MonoBehaviour
    {
        public float speed = 5f;
        private Rigidbody body;

        void Start()
        {
            body = GetComponent<Rigidbody>();
        }

        void Update()
        {
            var target = GameObject.Find("Target");
            if (target != null && Input.GetKey(KeyCode.Space))
            {
                body.AddForce(Vector3.up * speed);
            }
        }

        void LateUpdate()
        {
        }
    }
"#};

pub const AUDIO_MANAGER_SOURCE: &str = indoc! {r#"
    using UnityEngine;

    public class AudioManager : MonoBehaviour
    {
        private static AudioManager instance;
        public static AudioManager Instance { get { return instance; } }

        void Awake()
        {
            if (instance == null)
            {
                instance = this;
            }
        }

        public void Play(string clip)
        {
        }
    }
"#};

/// A small but complete project: standard folders, scripts, a scene,
/// a texture, an assembly definition and a package manifest.
pub fn sample_project() -> TempDir {
    UnityProjectBuilder::new()
        .folder("Assets/Prefabs")
        .folder("Assets/Materials")
        .script("Assets/Scripts/Chain.cs", CHAIN_SOURCE)
        .script("Assets/Scripts/PlayerController.cs", PLAYER_SOURCE)
        .script("Assets/Scripts/Audio/AudioManager.cs", AUDIO_MANAGER_SOURCE)
        .file("Assets/Scenes/Main.unity", "%YAML 1.1")
        .sized_file("Assets/Textures/Sky.png", 1024)
        .asmdef("Assets/Scripts/Game.asmdef", "Game", &[])
        .package_manifest(r#"{ "dependencies": { "com.unity.ugui": "1.0.0" } }"#)
        .file("README.md", "# Sample")
        .build()
}

pub fn path_of(dir: &TempDir) -> PathBuf {
    dir.path().to_path_buf()
}

pub fn exists(root: &Path, relative: &str) -> bool {
    root.join(relative).exists()
}
