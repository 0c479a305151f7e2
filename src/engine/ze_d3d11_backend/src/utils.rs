use raw_window_handle::RawWindowHandle;
use windows::Win32;
use windows::Win32::Foundation::HWND;
use windows::Win32::Graphics::Direct3D::*;
use windows::Win32::Graphics::Direct3D11::*;
use windows::Win32::Graphics::Dxgi::Common::*;
use ze_gfx::backend::*;
use ze_gfx::{PixelFormat, SampleDesc};

pub fn get_dxgi_format_from_ze_format(format: PixelFormat) -> DXGI_FORMAT {
    match format {
        PixelFormat::Unknown => DXGI_FORMAT_UNKNOWN,
        PixelFormat::R8G8B8A8Unorm => DXGI_FORMAT_R8G8B8A8_UNORM,
        PixelFormat::D24UnormS8Uint => DXGI_FORMAT_D24_UNORM_S8_UINT,
        PixelFormat::R32G32B32Float => DXGI_FORMAT_R32G32B32_FLOAT,
        PixelFormat::R32G32B32A32Float => DXGI_FORMAT_R32G32B32A32_FLOAT,
        PixelFormat::R32Uint => DXGI_FORMAT_R32_UINT,
        _ => DXGI_FORMAT_UNKNOWN,
    }
}

pub fn get_dxgi_sample_desc_from_ze_sample_desc(sample_desc: SampleDesc) -> DXGI_SAMPLE_DESC {
    DXGI_SAMPLE_DESC {
        Count: sample_desc.count,
        Quality: sample_desc.quality,
    }
}

pub fn get_dxgi_rational_from_ze_refresh_rate(refresh_rate: RefreshRate) -> DXGI_RATIONAL {
    DXGI_RATIONAL {
        Numerator: refresh_rate.numerator,
        Denominator: refresh_rate.denominator,
    }
}

pub fn get_ze_display_mode_from_dxgi_mode_desc(desc: &DXGI_MODE_DESC) -> DisplayMode {
    DisplayMode {
        width: desc.Width,
        height: desc.Height,
        refresh_rate: RefreshRate::new(desc.RefreshRate.Numerator, desc.RefreshRate.Denominator),
    }
}

pub fn get_hwnd_from_raw_window_handle(handle: RawWindowHandle) -> Option<HWND> {
    match handle {
        RawWindowHandle::Win32(handle) => Some(HWND(handle.hwnd as isize)),
        _ => None,
    }
}

pub fn get_d3d_usage_from_ze_resource_usage(usage: ResourceUsage) -> D3D11_USAGE {
    match usage {
        ResourceUsage::Default => D3D11_USAGE_DEFAULT,
        ResourceUsage::Immutable => D3D11_USAGE_IMMUTABLE,
        ResourceUsage::Dynamic => D3D11_USAGE_DYNAMIC,
        ResourceUsage::Staging => D3D11_USAGE_STAGING,
    }
}

pub fn get_d3d_bind_flags_from_ze_bind_flags(flags: BindFlags) -> u32 {
    let mut d3d_flags = 0;
    for flag in flags.iter() {
        d3d_flags |= match flag {
            BindFlagBits::VertexBuffer => D3D11_BIND_VERTEX_BUFFER.0,
            BindFlagBits::IndexBuffer => D3D11_BIND_INDEX_BUFFER.0,
            BindFlagBits::ConstantBuffer => D3D11_BIND_CONSTANT_BUFFER.0,
            BindFlagBits::ShaderResource => D3D11_BIND_SHADER_RESOURCE.0,
            BindFlagBits::RenderTarget => D3D11_BIND_RENDER_TARGET.0,
            BindFlagBits::DepthStencil => D3D11_BIND_DEPTH_STENCIL.0,
        };
    }
    d3d_flags as u32
}

pub fn get_d3d_cpu_access_flags_from_ze_cpu_access_flags(flags: CpuAccessFlags) -> u32 {
    let mut d3d_flags = 0;
    if flags.contains(CpuAccessFlagBits::Write) {
        d3d_flags |= D3D11_CPU_ACCESS_WRITE.0;
    }
    if flags.contains(CpuAccessFlagBits::Read) {
        d3d_flags |= D3D11_CPU_ACCESS_READ.0;
    }
    d3d_flags as u32
}

pub fn get_d3d_clear_flags_from_ze_clear_flags(flags: ClearFlags) -> u32 {
    let mut d3d_flags = 0;
    if flags.contains(ClearFlagBits::Depth) {
        d3d_flags |= D3D11_CLEAR_DEPTH.0;
    }
    if flags.contains(ClearFlagBits::Stencil) {
        d3d_flags |= D3D11_CLEAR_STENCIL.0;
    }
    d3d_flags as u32
}

pub fn get_d3d_compare_func_from_ze_compare_op(op: CompareOp) -> D3D11_COMPARISON_FUNC {
    match op {
        CompareOp::Never => D3D11_COMPARISON_NEVER,
        CompareOp::Less => D3D11_COMPARISON_LESS,
        CompareOp::Equal => D3D11_COMPARISON_EQUAL,
        CompareOp::LessEqual => D3D11_COMPARISON_LESS_EQUAL,
        CompareOp::Greater => D3D11_COMPARISON_GREATER,
        CompareOp::NotEqual => D3D11_COMPARISON_NOT_EQUAL,
        CompareOp::GreaterEqual => D3D11_COMPARISON_GREATER_EQUAL,
        CompareOp::Always => D3D11_COMPARISON_ALWAYS,
    }
}

pub fn get_d3d_stencil_op_from_ze_stencil_op(op: StencilOp) -> D3D11_STENCIL_OP {
    match op {
        StencilOp::Keep => D3D11_STENCIL_OP_KEEP,
        StencilOp::Zero => D3D11_STENCIL_OP_ZERO,
        StencilOp::Replace => D3D11_STENCIL_OP_REPLACE,
        StencilOp::IncrementSaturate => D3D11_STENCIL_OP_INCR_SAT,
        StencilOp::DecrementSaturate => D3D11_STENCIL_OP_DECR_SAT,
        StencilOp::Invert => D3D11_STENCIL_OP_INVERT,
        StencilOp::Increment => D3D11_STENCIL_OP_INCR,
        StencilOp::Decrement => D3D11_STENCIL_OP_DECR,
    }
}

pub fn get_d3d_depth_stencilop_desc_from_ze_stencil_op_desc(
    desc: &StencilOpDesc,
) -> D3D11_DEPTH_STENCILOP_DESC {
    D3D11_DEPTH_STENCILOP_DESC {
        StencilFailOp: get_d3d_stencil_op_from_ze_stencil_op(desc.fail_op),
        StencilDepthFailOp: get_d3d_stencil_op_from_ze_stencil_op(desc.depth_fail_op),
        StencilPassOp: get_d3d_stencil_op_from_ze_stencil_op(desc.pass_op),
        StencilFunc: get_d3d_compare_func_from_ze_compare_op(desc.compare_op),
    }
}

pub fn get_d3d_depth_write_mask_from_ze_depth_write_mask(
    mask: DepthWriteMask,
) -> D3D11_DEPTH_WRITE_MASK {
    match mask {
        DepthWriteMask::Zero => D3D11_DEPTH_WRITE_MASK_ZERO,
        DepthWriteMask::All => D3D11_DEPTH_WRITE_MASK_ALL,
    }
}

pub fn get_d3d_fill_mode_from_ze_fill_mode(mode: FillMode) -> D3D11_FILL_MODE {
    match mode {
        FillMode::Wireframe => D3D11_FILL_WIREFRAME,
        FillMode::Solid => D3D11_FILL_SOLID,
    }
}

pub fn get_d3d_cull_mode_from_ze_cull_mode(mode: CullMode) -> D3D11_CULL_MODE {
    match mode {
        CullMode::None => D3D11_CULL_NONE,
        CullMode::Front => D3D11_CULL_FRONT,
        CullMode::Back => D3D11_CULL_BACK,
    }
}

pub fn get_d3d_primitive_topology_from_ze_primitive_topology(
    topology: PrimitiveTopology,
) -> D3D_PRIMITIVE_TOPOLOGY {
    match topology {
        PrimitiveTopology::PointList => D3D_PRIMITIVE_TOPOLOGY_POINTLIST,
        PrimitiveTopology::LineList => D3D_PRIMITIVE_TOPOLOGY_LINELIST,
        PrimitiveTopology::TriangleList => D3D_PRIMITIVE_TOPOLOGY_TRIANGLELIST,
        PrimitiveTopology::TriangleStrip => D3D_PRIMITIVE_TOPOLOGY_TRIANGLESTRIP,
    }
}

pub fn get_dxgi_format_from_ze_index_buffer_format(format: IndexBufferFormat) -> DXGI_FORMAT {
    match format {
        IndexBufferFormat::Uint16 => DXGI_FORMAT_R16_UINT,
        IndexBufferFormat::Uint32 => DXGI_FORMAT_R32_UINT,
    }
}

pub fn get_d3d_feature_level_from_ze_feature_level(level: FeatureLevel) -> D3D_FEATURE_LEVEL {
    match level {
        FeatureLevel::Level10_0 => D3D_FEATURE_LEVEL_10_0,
        FeatureLevel::Level10_1 => D3D_FEATURE_LEVEL_10_1,
        FeatureLevel::Level11_0 => D3D_FEATURE_LEVEL_11_0,
    }
}

pub fn get_d3d_viewport_from_ze_viewport(viewport: &Viewport) -> D3D11_VIEWPORT {
    D3D11_VIEWPORT {
        TopLeftX: viewport.position.x,
        TopLeftY: viewport.position.y,
        Width: viewport.size.x,
        Height: viewport.size.y,
        MinDepth: viewport.min_depth,
        MaxDepth: viewport.max_depth,
    }
}

pub fn convert_d3d_error_to_ze_device_error(result: windows::core::Error) -> DeviceError {
    match result.code() {
        Win32::Foundation::E_OUTOFMEMORY => DeviceError::OutOfMemory,
        Win32::Foundation::E_INVALIDARG => DeviceError::InvalidParameters,
        Win32::Graphics::Dxgi::DXGI_ERROR_INVALID_CALL => DeviceError::InvalidParameters,
        Win32::Graphics::Dxgi::DXGI_ERROR_UNSUPPORTED => DeviceError::Unsupported,
        _ => DeviceError::Unknown,
    }
}

pub fn convert_dxgi_error_to_ze_backend_error(
    result: windows::core::Error,
    not_found: BackendError,
) -> BackendError {
    match result.code() {
        Win32::Graphics::Dxgi::DXGI_ERROR_NOT_FOUND => not_found,
        Win32::Graphics::Dxgi::DXGI_ERROR_UNSUPPORTED => BackendError::Unsupported,
        _ => BackendError::Unknown,
    }
}

/// Turn a D3D creation call result and its out parameter into the created object
pub fn get_created_object<T>(
    result: windows::core::Result<()>,
    object: Option<T>,
) -> Result<T, DeviceError> {
    result.map_err(convert_d3d_error_to_ze_device_error)?;
    object.ok_or(DeviceError::Unknown)
}
