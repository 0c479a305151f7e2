#![cfg(windows)]

use std::ffi::CString;
use windows::core::PCSTR;
use windows::Win32::Graphics::Direct3D::Fxc::{
    D3DCompile, D3DCOMPILE_DEBUG, D3DCOMPILE_ENABLE_STRICTNESS, D3DCOMPILE_OPTIMIZATION_LEVEL3,
};
use windows::Win32::Graphics::Direct3D::ID3DBlob;
use ze_core::ze_verbose;
use ze_gfx::ShaderStageFlagBits;
use ze_shader_compiler::{
    ShaderCompiler, ShaderCompilerError, ShaderCompilerInput, ShaderCompilerOutput,
};

#[cfg(debug_assertions)]
const COMPILE_FLAGS: u32 = D3DCOMPILE_ENABLE_STRICTNESS | D3DCOMPILE_DEBUG;

#[cfg(not(debug_assertions))]
const COMPILE_FLAGS: u32 = D3DCOMPILE_ENABLE_STRICTNESS | D3DCOMPILE_OPTIMIZATION_LEVEL3;

/// HLSL compiler targeting shader model 5.0 through FXC
#[derive(Default)]
pub struct D3D11ShaderCompiler;

impl D3D11ShaderCompiler {
    pub fn new() -> Self {
        Self
    }
}

fn blob_bytes(blob: &ID3DBlob) -> &[u8] {
    unsafe { std::slice::from_raw_parts(blob.GetBufferPointer() as *const u8, blob.GetBufferSize()) }
}

pub fn get_profile_from_stage(stage: ShaderStageFlagBits) -> &'static str {
    match stage {
        ShaderStageFlagBits::Vertex => "vs_5_0",
        ShaderStageFlagBits::Fragment => "ps_5_0",
    }
}

impl ShaderCompiler for D3D11ShaderCompiler {
    fn compile_shader(
        &self,
        input: ShaderCompilerInput,
    ) -> Result<ShaderCompilerOutput, ShaderCompilerError> {
        let to_cstring = |str: &str| {
            CString::new(str).map_err(|_| {
                ShaderCompilerError::new(input.name, "string contains an interior NUL")
            })
        };
        let name = to_cstring(input.name)?;
        let entry_point = to_cstring(input.entry_point)?;
        let profile = to_cstring(get_profile_from_stage(input.stage))?;

        let mut bytecode: Option<ID3DBlob> = None;
        let mut errors: Option<ID3DBlob> = None;
        let result = unsafe {
            D3DCompile(
                input.code.as_ptr() as *const _,
                input.code.len(),
                PCSTR(name.as_ptr() as *const u8),
                None,
                None,
                PCSTR(entry_point.as_ptr() as *const u8),
                PCSTR(profile.as_ptr() as *const u8),
                COMPILE_FLAGS,
                0,
                &mut bytecode,
                Some(&mut errors),
            )
        };

        let log = errors
            .as_ref()
            .map(|blob| String::from_utf8_lossy(blob_bytes(blob)).into_owned())
            .unwrap_or_default();

        match (result, bytecode) {
            (Ok(()), Some(bytecode)) => {
                if !log.is_empty() {
                    ze_verbose!("{}: {}", input.name, log.trim_end());
                }
                Ok(ShaderCompilerOutput::new(blob_bytes(&bytecode).to_vec()))
            }
            (Err(error), _) if log.is_empty() => Err(ShaderCompilerError::new(
                input.name,
                &error.message().to_string(),
            )),
            _ => Err(ShaderCompilerError::new(input.name, &log)),
        }
    }
}
