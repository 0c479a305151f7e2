use crate::device::{D3D11Device, D3D11DeviceContext};
use crate::utils::*;
use windows::Win32::Foundation::{BOOL, HMODULE};
use windows::Win32::Graphics::Direct3D::*;
use windows::Win32::Graphics::Direct3D11::*;
use windows::Win32::Graphics::Dxgi::Common::*;
use windows::Win32::Graphics::Dxgi::*;
use ze_core::ze_verbose;
use ze_gfx::backend::*;
use ze_gfx::PixelFormat;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum DriverType {
    Hardware,
    Reference,
    Warp,
}

impl DriverType {
    fn as_d3d(self) -> D3D_DRIVER_TYPE {
        match self {
            DriverType::Hardware => D3D_DRIVER_TYPE_HARDWARE,
            DriverType::Reference => D3D_DRIVER_TYPE_REFERENCE,
            DriverType::Warp => D3D_DRIVER_TYPE_WARP,
        }
    }
}

pub struct D3D11Backend {
    factory: IDXGIFactory,
    driver_type: DriverType,
}

impl D3D11Backend {
    pub fn new(driver_type: DriverType) -> Result<D3D11Backend, BackendError> {
        let factory = unsafe {
            match CreateDXGIFactory::<IDXGIFactory>() {
                Ok(factory) => factory,
                Err(_) => return Err(BackendError::Unsupported),
            }
        };

        ze_verbose!("Created DXGI factory ({:?} driver)", driver_type);
        Ok(D3D11Backend {
            factory,
            driver_type,
        })
    }
}

impl Backend for D3D11Backend {
    fn name(&self) -> &str {
        "Direct3D 11"
    }

    fn adapter(&self, index: u32) -> Result<Box<dyn Adapter>, BackendError> {
        let adapter = unsafe { self.factory.EnumAdapters(index) }.map_err(|error| {
            convert_dxgi_error_to_ze_backend_error(error, BackendError::AdapterNotFound)
        })?;
        Ok(Box::new(D3D11Adapter { adapter }))
    }

    fn create_device_and_swapchain(
        &self,
        feature_level: FeatureLevel,
        desc: &SwapChainDesc,
    ) -> Result<DeviceAndSwapChain, DeviceError> {
        let hwnd = get_hwnd_from_raw_window_handle(desc.window_handle)
            .ok_or(DeviceError::InvalidParameters)?;

        let swapchain_desc = DXGI_SWAP_CHAIN_DESC {
            BufferDesc: DXGI_MODE_DESC {
                Width: desc.width,
                Height: desc.height,
                RefreshRate: get_dxgi_rational_from_ze_refresh_rate(desc.refresh_rate),
                Format: get_dxgi_format_from_ze_format(desc.format),
                ScanlineOrdering: DXGI_MODE_SCANLINE_ORDER_UNSPECIFIED,
                Scaling: DXGI_MODE_SCALING_UNSPECIFIED,
            },
            SampleDesc: get_dxgi_sample_desc_from_ze_sample_desc(desc.sample_desc),
            BufferUsage: DXGI_USAGE_RENDER_TARGET_OUTPUT,
            BufferCount: desc.buffer_count,
            OutputWindow: hwnd,
            Windowed: BOOL::from(desc.windowed),
            SwapEffect: DXGI_SWAP_EFFECT_DISCARD,
            Flags: 0,
        };

        let feature_levels = [get_d3d_feature_level_from_ze_feature_level(feature_level)];
        let mut swapchain: Option<IDXGISwapChain> = None;
        let mut device: Option<ID3D11Device> = None;
        let mut context: Option<ID3D11DeviceContext> = None;

        unsafe {
            D3D11CreateDeviceAndSwapChain(
                None,
                self.driver_type.as_d3d(),
                HMODULE::default(),
                D3D11_CREATE_DEVICE_FLAG(0),
                Some(&feature_levels),
                D3D11_SDK_VERSION,
                Some(&swapchain_desc),
                Some(&mut swapchain),
                Some(&mut device),
                None,
                Some(&mut context),
            )
        }
        .map_err(convert_d3d_error_to_ze_device_error)?;

        match (device, context, swapchain) {
            (Some(device), Some(context), Some(swapchain)) => Ok(DeviceAndSwapChain {
                device: Box::new(D3D11Device::new(device)),
                context: Box::new(D3D11DeviceContext::new(context)),
                swapchain: SwapChain::new(*desc, Box::new(swapchain)),
            }),
            _ => Err(DeviceError::Unknown),
        }
    }
}

pub struct D3D11Adapter {
    adapter: IDXGIAdapter,
}

impl Adapter for D3D11Adapter {
    fn desc(&self) -> Result<AdapterDesc, BackendError> {
        let desc = unsafe { self.adapter.GetDesc() }.map_err(|_| BackendError::Unknown)?;
        Ok(AdapterDesc {
            description: desc.Description.to_vec(),
            dedicated_video_memory: desc.DedicatedVideoMemory as u64,
        })
    }

    fn output(&self, index: u32) -> Result<Box<dyn Output>, BackendError> {
        let output = unsafe { self.adapter.EnumOutputs(index) }.map_err(|error| {
            convert_dxgi_error_to_ze_backend_error(error, BackendError::OutputNotFound)
        })?;
        Ok(Box::new(D3D11Output { output }))
    }
}

pub struct D3D11Output {
    output: IDXGIOutput,
}

impl Output for D3D11Output {
    fn display_mode_count(&self, format: PixelFormat) -> Result<u32, BackendError> {
        let mut count = 0;
        unsafe {
            self.output.GetDisplayModeList(
                get_dxgi_format_from_ze_format(format),
                DXGI_ENUM_MODES_INTERLACED,
                &mut count,
                None,
            )
        }
        .map_err(|_| BackendError::Unknown)?;
        Ok(count)
    }

    fn display_modes(
        &self,
        format: PixelFormat,
        count: u32,
    ) -> Result<Vec<DisplayMode>, BackendError> {
        let mut count = count;
        let mut modes = vec![DXGI_MODE_DESC::default(); count as usize];
        unsafe {
            self.output.GetDisplayModeList(
                get_dxgi_format_from_ze_format(format),
                DXGI_ENUM_MODES_INTERLACED,
                &mut count,
                Some(modes.as_mut_ptr()),
            )
        }
        .map_err(|_| BackendError::Unknown)?;

        // The driver may report fewer modes than requested
        modes.truncate(count as usize);
        Ok(modes
            .iter()
            .map(get_ze_display_mode_from_dxgi_mode_desc)
            .collect())
    }
}
