//! Project manifest (`extbuild.toml`)
//!
//! Declares the extensions a package builds and where their output goes:
//!
//! ```toml
//! [build]
//! build_temp = "build/temp"
//! build_lib = "build/lib"
//!
//! [output]
//! layout = "nested"
//! subpath = "oineus/bindings/python"
//!
//! [[extension]]
//! name = "oineus"
//! root_dir = "oineus"
//! defines = { CMAKE_BUILD_TYPE = "Release" }
//! ```
//!
//! Relative paths are resolved against the directory holding the manifest.

use crate::extensions::configurer::RESERVED_VARS;
use crate::extensions::{BuildTarget, FlatLayout, NestedLayout, OutputLayout};
use crate::paths;
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Parsed project manifest
#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub build: BuildSection,

    #[serde(default)]
    pub output: OutputSection,

    #[serde(default, rename = "extension")]
    pub extensions: Vec<ExtensionDecl>,

    /// Directory containing the manifest
    #[serde(skip)]
    base_dir: PathBuf,
}

/// Scratch and output directories
#[derive(Debug, Clone, Deserialize)]
pub struct BuildSection {
    #[serde(default = "default_build_temp")]
    pub build_temp: PathBuf,

    #[serde(default = "default_build_lib")]
    pub build_lib: PathBuf,
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            build_temp: default_build_temp(),
            build_lib: default_build_lib(),
        }
    }
}

fn default_build_temp() -> PathBuf {
    PathBuf::from("build").join("temp")
}

fn default_build_lib() -> PathBuf {
    PathBuf::from("build").join("lib")
}

/// Where compiled libraries land relative to the build-lib directory
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(tag = "layout", rename_all = "lowercase")]
pub enum OutputSection {
    /// The module's own directory
    #[default]
    Flat,

    /// A fixed subpath inside the module's directory
    Nested { subpath: PathBuf },
}

/// One `[[extension]]` entry
#[derive(Debug, Clone, Deserialize)]
pub struct ExtensionDecl {
    pub name: String,
    pub root_dir: PathBuf,
    #[serde(default)]
    pub defines: toml::Table,
}

impl Manifest {
    /// Load and validate a manifest file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, does not parse, or
    /// declares something invalid.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest {}", path.display()))?;
        let base_dir = path
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        let base_dir = std::path::absolute(&base_dir)
            .with_context(|| format!("Failed to resolve {}", base_dir.display()))?;

        Self::parse(&contents, &base_dir)
            .with_context(|| format!("Invalid manifest {}", path.display()))
    }

    /// Find the manifest (explicit path or nearest `extbuild.toml`) and load it.
    pub fn discover(custom_path: Option<&Path>) -> Result<Self> {
        let path = match custom_path {
            Some(path) => path.to_path_buf(),
            None => paths::find_manifest().with_context(|| {
                format!(
                    "No {} found in the current directory or its parents",
                    paths::MANIFEST_FILE
                )
            })?,
        };
        Self::load(&path)
    }

    /// Parse manifest text; relative paths resolve against `base_dir`.
    pub fn parse(contents: &str, base_dir: &Path) -> Result<Self> {
        let mut manifest: Self = toml::from_str(contents)?;
        manifest.base_dir = base_dir.to_path_buf();
        manifest.validate()?;
        Ok(manifest)
    }

    fn validate(&self) -> Result<()> {
        if let OutputSection::Nested { subpath } = &self.output
            && subpath.is_absolute()
        {
            bail!("output subpath must be relative, got {}", subpath.display());
        }

        for ext in &self.extensions {
            if ext.name.is_empty() || ext.name.split('.').any(str::is_empty) {
                bail!("extension name `{}` is not a valid module name", ext.name);
            }
            for (key, value) in &ext.defines {
                if RESERVED_VARS.contains(&key.as_str()) {
                    bail!(
                        "extension `{}` may not set {key}; it is derived from the toolchain",
                        ext.name
                    );
                }
                define_value(value).with_context(|| {
                    format!("define {key} of extension `{}`", ext.name)
                })?;
            }
        }

        Ok(())
    }

    /// Directory the manifest lives in; submodules are synced from here
    pub fn project_root(&self) -> &Path {
        &self.base_dir
    }

    pub fn build_temp(&self) -> Result<PathBuf> {
        Ok(paths::resolve_against(&self.base_dir, &self.build.build_temp)?)
    }

    pub fn build_lib(&self) -> Result<PathBuf> {
        Ok(paths::resolve_against(&self.base_dir, &self.build.build_lib)?)
    }

    /// Output layout strategy rooted at `build_lib`
    pub fn layout(&self, build_lib: PathBuf) -> Box<dyn OutputLayout> {
        match &self.output {
            OutputSection::Flat => Box::new(FlatLayout::new(build_lib)),
            OutputSection::Nested { subpath } => {
                Box::new(NestedLayout::new(build_lib, subpath.clone()))
            }
        }
    }

    /// Build targets in declaration order
    pub fn targets(&self) -> Result<Vec<BuildTarget>> {
        self.extensions
            .iter()
            .map(|ext| -> Result<BuildTarget> {
                let root = paths::resolve_against(&self.base_dir, &ext.root_dir)?;
                let mut target = BuildTarget::new(&ext.name, root);
                for (key, value) in &ext.defines {
                    target = target.with_define(key, define_value(value)?);
                }
                Ok(target)
            })
            .collect()
    }
}

/// Render a TOML scalar as a generator variable value
fn define_value(value: &toml::Value) -> Result<String> {
    match value {
        toml::Value::String(s) => Ok(s.clone()),
        toml::Value::Integer(i) => Ok(i.to_string()),
        toml::Value::Float(f) => Ok(f.to_string()),
        toml::Value::Boolean(b) => Ok(if *b { "ON" } else { "OFF" }.to_string()),
        other => bail!("expected a string, number or boolean, got {}", other.type_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const OINEUS: &str = r#"
[output]
layout = "nested"
subpath = "oineus/bindings/python"

[[extension]]
name = "oineus"
root_dir = "oineus"
defines = { CMAKE_BUILD_TYPE = "Release", OINEUS_USE_TBB = true, JOBS = 2 }
"#;

    #[test]
    fn parses_full_manifest() {
        let manifest = Manifest::parse(OINEUS, Path::new("/project")).unwrap();

        assert_eq!(
            manifest.output,
            OutputSection::Nested {
                subpath: PathBuf::from("oineus/bindings/python")
            }
        );
        assert_eq!(
            manifest.build_temp().unwrap(),
            PathBuf::from("/project/build/temp")
        );
        assert_eq!(
            manifest.build_lib().unwrap(),
            PathBuf::from("/project/build/lib")
        );

        let targets = manifest.targets().unwrap();
        assert_eq!(targets.len(), 1);
        let target = targets.first().unwrap();
        assert_eq!(target.name(), "oineus");
        assert_eq!(target.root_dir(), Path::new("/project/oineus"));
        assert_eq!(
            target.defines(),
            &[
                ("CMAKE_BUILD_TYPE".to_string(), "Release".to_string()),
                ("OINEUS_USE_TBB".to_string(), "ON".to_string()),
                ("JOBS".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn defaults_to_flat_layout() {
        let manifest = Manifest::parse(
            "[[extension]]\nname = \"ext\"\nroot_dir = \"/src/ext\"\n",
            Path::new("/project"),
        )
        .unwrap();

        assert_eq!(manifest.output, OutputSection::Flat);
        let layout = manifest.layout(PathBuf::from("/out"));
        let target = BuildTarget::new("ext", "/src/ext");
        assert_eq!(layout.output_dir(&target), PathBuf::from("/out"));
    }

    #[test]
    fn nested_layout_joins_subpath() {
        let manifest = Manifest::parse(OINEUS, Path::new("/project")).unwrap();
        let layout = manifest.layout(PathBuf::from("/project/build/lib"));
        let target = BuildTarget::new("oineus", "/project/oineus");

        assert_eq!(
            layout.output_dir(&target),
            PathBuf::from("/project/build/lib/oineus/bindings/python")
        );
    }

    #[test]
    fn rejects_reserved_define() {
        let err = Manifest::parse(
            "[[extension]]\nname = \"ext\"\nroot_dir = \"ext\"\ndefines = { CMAKE_CXX_COMPILER = \"g++\" }\n",
            Path::new("/project"),
        )
        .unwrap_err();

        assert!(err.to_string().contains("CMAKE_CXX_COMPILER"));
    }

    #[test]
    fn rejects_table_define() {
        let result = Manifest::parse(
            "[[extension]]\nname = \"ext\"\nroot_dir = \"ext\"\n[extension.defines]\nNESTED = { a = 1 }\n",
            Path::new("/project"),
        );

        assert!(result.is_err());
    }

    #[test]
    fn rejects_bad_module_name() {
        let result = Manifest::parse(
            "[[extension]]\nname = \"pkg..ext\"\nroot_dir = \"ext\"\n",
            Path::new("/project"),
        );

        assert!(result.is_err());
    }

    #[test]
    fn rejects_absolute_subpath() {
        let result = Manifest::parse(
            "[output]\nlayout = \"nested\"\nsubpath = \"/abs\"\n",
            Path::new("/project"),
        );

        assert!(result.is_err());
    }

    #[test]
    fn load_resolves_against_manifest_dir() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(paths::MANIFEST_FILE);
        fs::write(&path, OINEUS).unwrap();

        let manifest = Manifest::load(&path).unwrap();
        assert_eq!(manifest.project_root(), temp.path());
        let targets = manifest.targets().unwrap();
        assert_eq!(
            targets.first().map(BuildTarget::root_dir),
            Some(temp.path().join("oineus").as_path())
        );
    }

    #[test]
    fn load_missing_file_mentions_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing.toml");

        let err = Manifest::load(&path).unwrap_err();
        assert!(err.to_string().contains("missing.toml"));
    }
}
