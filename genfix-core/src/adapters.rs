//! Default port implementations: a process-backed generator and a filesystem writer.

use crate::error::GeneratorError;
use crate::ports::{GenerationRequest, Generator, WritePort};
use anyhow::Context;
use camino::Utf8Path;
use fs_err as fs;
use genfix_contract::{DEFAULT_SPEC_VERSION, FieldDef, TypeDef, load_contract, type_definitions};
use genfix_types::field::FieldKind;
use std::process::Command;
use tracing::{debug, info};

/// Runs the generator as a child process.
///
/// `command` is the argv prefix (for example `["openapi-generator-cli"]` or
/// `["java", "-jar", "openapi-generator-cli.jar"]`); the `generate` arguments
/// for each request are appended to it.
#[derive(Debug, Clone)]
pub struct ProcessGenerator {
    command: Vec<String>,
}

impl ProcessGenerator {
    pub fn new(command: Vec<String>) -> Self {
        Self { command }
    }

    pub fn command(&self) -> &[String] {
        &self.command
    }

    /// Arguments appended after the command prefix.
    pub fn request_args(request: &GenerationRequest<'_>) -> Vec<String> {
        let params = request.params;
        let mut args = vec![
            "generate".to_string(),
            "-g".to_string(),
            params.flavor.clone(),
            "-i".to_string(),
            request.contract_path.to_string(),
            "-o".to_string(),
            request.output_dir.to_string(),
            format!("--additional-properties={}", params.additional_properties_arg()),
        ];
        if !params.global_properties.is_empty() {
            args.push(format!(
                "--global-property={}",
                params.global_properties.join(",")
            ));
        }
        args
    }
}

impl Generator for ProcessGenerator {
    fn generate(&self, request: &GenerationRequest<'_>) -> Result<(), GeneratorError> {
        let (program, prefix) = self
            .command
            .split_first()
            .ok_or(GeneratorError::NotConfigured)?;
        let args = Self::request_args(request);

        info!(
            program = %program,
            flavor = %request.params.flavor,
            contract = %request.contract_path,
            output = %request.output_dir,
            "invoking generator"
        );
        debug!(args = ?args, "generator arguments");

        let output = Command::new(program)
            .args(prefix)
            .args(&args)
            .output()
            .map_err(|source| GeneratorError::Spawn {
                program: program.clone(),
                source,
            })?;

        if !output.stdout.is_empty() {
            debug!(stdout = %String::from_utf8_lossy(&output.stdout), "generator output");
        }
        if !output.status.success() {
            return Err(GeneratorError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(())
    }
}

/// In-process generator for embedding and testing.
///
/// Renders one C# model per declared type under `src/<package>/Model/`, with the
/// same `DataMember` directive shape the `csharp-netcore` generator emits, plus a
/// project file so install filtering has something to exclude.
#[derive(Debug, Clone, Default)]
pub struct StubGenerator;

impl StubGenerator {
    fn render_model(package: &str, ty: &TypeDef, emit_optional: bool) -> String {
        let mut out = String::new();
        out.push_str("using System.Runtime.Serialization;\n\n");
        out.push_str(&format!("namespace {package}.Model\n{{\n"));
        out.push_str("    [DataContract]\n");
        out.push_str(&format!("    public partial class {}\n    {{\n", ty.name));
        for field in &ty.fields {
            if field.required {
                out.push_str(&format!(
                    "        [DataMember(Name = \"{}\", IsRequired = true, EmitDefaultValue = true)]\n",
                    field.name
                ));
            } else {
                out.push_str(&format!(
                    "        [DataMember(Name = \"{}\", EmitDefaultValue = {})]\n",
                    field.name, emit_optional
                ));
            }
            out.push_str(&format!(
                "        public {} {} {{ get; set; }}\n\n",
                csharp_type(field),
                field.name
            ));
        }
        out.push_str("    }\n}\n");
        out
    }
}

fn csharp_type(field: &FieldDef) -> String {
    let (name, value_type) = match field.kind {
        FieldKind::Number => ("decimal", true),
        FieldKind::Integer => ("long", true),
        FieldKind::Boolean => ("bool", true),
        FieldKind::String => ("string", false),
        FieldKind::Array => ("List<Object>", false),
        FieldKind::Object | FieldKind::Reference => ("Object", false),
    };
    if value_type && (field.nullable || !field.required) {
        format!("{name}?")
    } else {
        name.to_string()
    }
}

impl Generator for StubGenerator {
    fn generate(&self, request: &GenerationRequest<'_>) -> Result<(), GeneratorError> {
        let failed = |stderr: String| GeneratorError::Failed {
            status: "in-process stub".to_string(),
            stderr,
        };
        let contract = load_contract(request.contract_path, DEFAULT_SPEC_VERSION)
            .map_err(|e| failed(e.to_string()))?;
        let package = &request.params.package;
        let project = request.output_dir.join("src").join(package);
        let models = project.join("Model");
        fs::create_dir_all(&models).map_err(|e| failed(e.to_string()))?;

        let types = contract.schemas().map(type_definitions).unwrap_or_default();
        for ty in &types {
            let body = Self::render_model(
                package,
                ty,
                request.params.optional_emit_default_values,
            );
            fs::write(models.join(format!("{}.cs", ty.name)), body)
                .map_err(|e| failed(e.to_string()))?;
        }
        fs::write(
            project.join(format!("{package}.csproj")),
            "<Project Sdk=\"Microsoft.NET.Sdk\" />\n",
        )
        .map_err(|e| failed(e.to_string()))?;

        debug!(models = types.len(), output = %request.output_dir, "stub generator wrote models");
        Ok(())
    }
}

/// Filesystem write operations.
#[derive(Debug, Clone, Default)]
pub struct FsWritePort;

impl WritePort for FsWritePort {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create parent dir for {}", path))?;
        }
        fs::write(path, contents).with_context(|| format!("write {}", path))
    }

    fn create_dir_all(&self, path: &Utf8Path) -> anyhow::Result<()> {
        fs::create_dir_all(path).with_context(|| format!("create_dir_all {}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use genfix_types::params::GeneratorParams;
    use tempfile::TempDir;

    fn params() -> GeneratorParams {
        let mut p = GeneratorParams::new("csharp-netcore", "Acme.Sdk");
        p.additional_properties
            .insert("targetFramework".to_string(), "net8.0".to_string());
        p
    }

    #[test]
    fn request_args_follow_generate_convention() {
        let params = params();
        let request = GenerationRequest {
            contract_path: Utf8Path::new("stage/contract.yaml"),
            output_dir: Utf8Path::new("stage/generated"),
            params: &params,
        };
        assert_eq!(
            ProcessGenerator::request_args(&request),
            vec![
                "generate",
                "-g",
                "csharp-netcore",
                "-i",
                "stage/contract.yaml",
                "-o",
                "stage/generated",
                "--additional-properties=packageName=Acme.Sdk,optionalEmitDefaultValues=true,useOneOfDiscriminatorLookup=true,validatable=false,targetFramework=net8.0",
            ]
        );
    }

    #[test]
    fn global_properties_are_appended() {
        let mut params = params();
        params.global_properties = vec!["models".to_string(), "supportingFiles".to_string()];
        let request = GenerationRequest {
            contract_path: Utf8Path::new("c.yaml"),
            output_dir: Utf8Path::new("out"),
            params: &params,
        };
        let args = ProcessGenerator::request_args(&request);
        assert_eq!(
            args.last().map(String::as_str),
            Some("--global-property=models,supportingFiles")
        );
    }

    #[test]
    fn empty_command_is_not_configured() {
        let params = params();
        let request = GenerationRequest {
            contract_path: Utf8Path::new("c.yaml"),
            output_dir: Utf8Path::new("out"),
            params: &params,
        };
        let err = ProcessGenerator::new(vec![]).generate(&request).unwrap_err();
        assert!(matches!(err, GeneratorError::NotConfigured));
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let params = params();
        let request = GenerationRequest {
            contract_path: Utf8Path::new("c.yaml"),
            output_dir: Utf8Path::new("out"),
            params: &params,
        };
        let err = ProcessGenerator::new(vec!["genfix-no-such-generator-binary".to_string()])
            .generate(&request)
            .unwrap_err();
        assert!(matches!(err, GeneratorError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_carries_stderr() {
        let params = params();
        let request = GenerationRequest {
            contract_path: Utf8Path::new("c.yaml"),
            output_dir: Utf8Path::new("out"),
            params: &params,
        };
        let generator = ProcessGenerator::new(vec![
            "sh".to_string(),
            "-c".to_string(),
            "echo 'bad contract' >&2; exit 7".to_string(),
            "sh".to_string(),
        ]);
        match generator.generate(&request).unwrap_err() {
            GeneratorError::Failed { stderr, .. } => assert_eq!(stderr, "bad contract\n"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn stub_generator_renders_data_members() {
        let temp = TempDir::new().unwrap();
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
        let contract = root.join("contract.yaml");
        std::fs::write(
            &contract,
            "openapi: 3.0.0\ncomponents:\n  schemas:\n    Account:\n      type: object\n      required: [id]\n      properties:\n        id:\n          type: string\n        balance:\n          type: integer\n          nullable: true\n",
        )
        .unwrap();
        let params = GeneratorParams::new("csharp-netcore", "Acme.Sdk");
        let out = root.join("generated");
        StubGenerator
            .generate(&GenerationRequest {
                contract_path: &contract,
                output_dir: &out,
                params: &params,
            })
            .unwrap();

        let model =
            std::fs::read_to_string(out.join("src/Acme.Sdk/Model/Account.cs")).unwrap();
        assert!(model.contains(
            r#"[DataMember(Name = "id", IsRequired = true, EmitDefaultValue = true)]"#
        ));
        assert!(model.contains(r#"[DataMember(Name = "balance", EmitDefaultValue = true)]"#));
        assert!(model.contains("public long? balance { get; set; }"));
        assert!(out.join("src/Acme.Sdk/Acme.Sdk.csproj").is_file());
    }

    #[test]
    fn fs_write_port_creates_parents() {
        let temp = TempDir::new().unwrap();
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
        let path = root.join("a/b/ledger.json");
        FsWritePort.write_file(&path, b"{}").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
    }
}
