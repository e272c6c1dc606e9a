use crate::entities_generator::write_file;
use crate::error::EmitError;
use crate::name_transform::{class_file_path, rust_ident, short_name};
use crate::rustfmt::format_file;
use quote::quote;
use std::path::Path;
use tracing::{debug, info};

pub trait RepositoryEmitter {
    /// Scaffolds the repository `class_name` below `dir` unless its file
    /// already exists. Returns whether a file was written.
    fn write_one(&self, class_name: &str, dir: &Path) -> Result<bool, EmitError>;
}

/// Emits repositories as Rust unit structs. Repositories belong to the
/// developer once scaffolded, so existing files are never touched.
#[derive(Clone, Debug, Default)]
pub struct RustRepositoryEmitter {
    rustfmt: bool,
}

impl RustRepositoryEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rustfmt(mut self, value: bool) -> Self {
        self.rustfmt = value;
        self
    }
}

impl RepositoryEmitter for RustRepositoryEmitter {
    fn write_one(&self, class_name: &str, dir: &Path) -> Result<bool, EmitError> {
        let path = class_file_path(dir, class_name);

        if path.exists() {
            debug!(repository = class_name, path = %path.display(), "repository exists, left untouched");
            return Ok(false);
        }

        write_file(&path, &render_repository(class_name)?)?;
        if self.rustfmt {
            format_file(&path);
        }

        info!(repository = class_name, path = %path.display(), "repository written");

        Ok(true)
    }
}

pub fn render_repository(class_name: &str) -> Result<String, EmitError> {
    let name = short_name(class_name);
    let ident = rust_ident(name).ok_or_else(|| EmitError::InvalidIdentifier {
        what: "repository",
        name: name.to_string(),
    })?;
    let doc = format!("Repository `{}`. Add query methods to the impl block.", class_name);

    let tokens = quote! {
        #[doc = #doc]
        #[derive(Clone, Copy, Debug, Default)]
        pub struct #ident;

        impl #ident {
            pub const CLASS: &'static str = #class_name;
        }
    };

    Ok(format!("{}\n", tokens))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn renders_unit_struct() {
        let source = render_repository("App\\Repositories\\OrderItems").unwrap();

        assert!(source.contains("pub struct OrderItems ;"));
        assert!(source.contains(r#"CLASS : & 'static str = "App\\Repositories\\OrderItems""#));
    }

    #[test]
    fn writes_only_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        let emitter = RustRepositoryEmitter::new();

        assert!(emitter.write_one("App\\Repositories\\Orders", dir.path()).unwrap());

        let path = dir.path().join("App/Repositories/Orders.rs");
        fs::write(&path, "// mine\n").unwrap();

        assert!(!emitter.write_one("App\\Repositories\\Orders", dir.path()).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "// mine\n");
    }

    #[test]
    fn rejects_invalid_names() {
        assert!(matches!(
            render_repository("App\\Repositories\\order items"),
            Err(EmitError::InvalidIdentifier { what: "repository", .. })
        ));
        assert!(matches!(
            render_repository("App\\Repositories\\Self"),
            Err(EmitError::InvalidIdentifier { what: "repository", .. })
        ));
    }
}
