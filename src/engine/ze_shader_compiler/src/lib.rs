use std::fmt::{Display, Formatter};
use ze_gfx::ShaderStageFlagBits;

pub struct ShaderCompilerInput<'a> {
    pub name: &'a str,
    pub stage: ShaderStageFlagBits,
    pub code: &'a [u8],
    pub entry_point: &'a str,
}

pub struct ShaderCompilerOutput {
    pub bytecode: Vec<u8>,
}

impl ShaderCompilerOutput {
    pub fn new(bytecode: Vec<u8>) -> Self {
        Self { bytecode }
    }
}

/// Compiler diagnostics, one entry per line reported by the compiler
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShaderCompilerError {
    pub name: String,
    pub messages: Vec<String>,
}

impl ShaderCompilerError {
    pub fn new(name: &str, log: &str) -> Self {
        Self {
            name: name.to_string(),
            messages: log
                .lines()
                .map(str::trim_end)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

impl Display for ShaderCompilerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "failed to compile shader {}", self.name)?;
        for message in &self.messages {
            write!(f, "\n{}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ShaderCompilerError {}

pub trait ShaderCompiler {
    fn compile_shader(
        &self,
        input: ShaderCompilerInput,
    ) -> Result<ShaderCompilerOutput, ShaderCompilerError>;
}

#[cfg(test)]
mod tests {
    use crate::ShaderCompilerError;

    #[test]
    fn error_log_is_split_per_line() {
        let error = ShaderCompilerError::new(
            "color.vs",
            "color.vs(3,5): error X3000: syntax error\r\n\ncolor.vs(9,1): warning X3206: implicit truncation\n",
        );
        assert_eq!(
            error.messages,
            vec![
                "color.vs(3,5): error X3000: syntax error".to_string(),
                "color.vs(9,1): warning X3206: implicit truncation".to_string(),
            ]
        );
        assert_eq!(
            error.to_string(),
            "failed to compile shader color.vs\ncolor.vs(3,5): error X3000: syntax error\ncolor.vs(9,1): warning X3206: implicit truncation"
        );
    }
}
