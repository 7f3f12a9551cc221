use std::mem;
use std::ptr;

use libc::{c_void, size_t};

use crate::cl::ll::runtime;
use crate::cl::*;
use crate::error::{check_quiet, Result};

/// Scalar element types for the preferred vector width queries.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum VectorType {
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl VectorType {
    pub const ALL: [VectorType; 6] = [
        VectorType::Char,
        VectorType::Short,
        VectorType::Int,
        VectorType::Long,
        VectorType::Float,
        VectorType::Double,
    ];

    fn param(self) -> cl_device_info {
        match self {
            VectorType::Char => CL_DEVICE_PREFERRED_VECTOR_WIDTH_CHAR,
            VectorType::Short => CL_DEVICE_PREFERRED_VECTOR_WIDTH_SHORT,
            VectorType::Int => CL_DEVICE_PREFERRED_VECTOR_WIDTH_INT,
            VectorType::Long => CL_DEVICE_PREFERRED_VECTOR_WIDTH_LONG,
            VectorType::Float => CL_DEVICE_PREFERRED_VECTOR_WIDTH_FLOAT,
            VectorType::Double => CL_DEVICE_PREFERRED_VECTOR_WIDTH_DOUBLE,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            VectorType::Char => "CHAR",
            VectorType::Short => "SHORT",
            VectorType::Int => "INT",
            VectorType::Long => "LONG",
            VectorType::Float => "FLOAT",
            VectorType::Double => "DOUBLE",
        }
    }
}

/// An OpenCL device.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Device {
    id: cl_device_id,
}

unsafe impl Sync for Device {}
unsafe impl Send for Device {}

impl Device {
    /// Creates a new device from its OpenCL identifier.
    ///
    /// The identifier validity is not checked.
    pub unsafe fn new_unchecked(id: cl_device_id) -> Device {
        Device { id }
    }

    /// The device OpenCL id.
    pub fn cl_id(&self) -> cl_device_id {
        self.id
    }

    fn profile_info(&self, name: cl_device_info) -> Result<String> {
        let rt = runtime()?;
        let mut size: size_t = 0;

        let status = unsafe { (rt.clGetDeviceInfo)(self.id, name, 0, ptr::null_mut(), &mut size) };
        check_quiet(status, "Determining device info string length")?;

        let mut buf = vec![0u8; size];
        let status = unsafe {
            (rt.clGetDeviceInfo)(
                self.id,
                name,
                size,
                buf.as_mut_ptr() as *mut c_void,
                ptr::null_mut(),
            )
        };
        check_quiet(status, "Getting device info string")?;

        Ok(crate::util::c_string(buf))
    }

    fn scalar_info<T: Copy + Default>(&self, name: cl_device_info) -> Result<T> {
        let rt = runtime()?;
        let mut value = T::default();
        let status = unsafe {
            (rt.clGetDeviceInfo)(
                self.id,
                name,
                mem::size_of::<T>(),
                (&mut value as *mut T) as *mut c_void,
                ptr::null_mut(),
            )
        };
        check_quiet(status, "Getting device info value")?;
        Ok(value)
    }

    fn bool_info(&self, name: cl_device_info) -> Result<bool> {
        self.scalar_info::<cl_bool>(name).map(|b| b == CL_TRUE)
    }

    /// The device name.
    pub fn name(&self) -> Result<String> {
        self.profile_info(CL_DEVICE_NAME)
    }

    /// The device vendor.
    pub fn vendor(&self) -> Result<String> {
        self.profile_info(CL_DEVICE_VENDOR)
    }

    /// The version of the driver backing this device.
    pub fn driver_version(&self) -> Result<String> {
        self.profile_info(CL_DRIVER_VERSION)
    }

    /// The OpenCL version supported by the device, e.g. `"OpenCL 1.2 CUDA"`.
    pub fn version(&self) -> Result<String> {
        self.profile_info(CL_DEVICE_VERSION)
    }

    /// The highest OpenCL C version accepted by the device compiler.
    ///
    /// Not defined for devices reporting OpenCL 1.0.
    pub fn opencl_c_version(&self) -> Result<String> {
        self.profile_info(CL_DEVICE_OPENCL_C_VERSION)
    }

    /// The space separated extension list.
    pub fn extensions(&self) -> Result<String> {
        self.profile_info(CL_DEVICE_EXTENSIONS)
    }

    /// The device type flags.
    pub fn device_type(&self) -> Result<cl_device_type> {
        self.scalar_info(CL_DEVICE_TYPE)
    }

    /// The maximum number of compute units of this device.
    pub fn compute_units(&self) -> Result<cl_uint> {
        self.scalar_info(CL_DEVICE_MAX_COMPUTE_UNITS)
    }

    pub fn max_work_item_dimensions(&self) -> Result<cl_uint> {
        self.scalar_info(CL_DEVICE_MAX_WORK_ITEM_DIMENSIONS)
    }

    /// The maximum work-item count per dimension.
    pub fn max_work_item_sizes(&self) -> Result<Vec<usize>> {
        let rt = runtime()?;
        let mut size: size_t = 0;
        let status = unsafe {
            (rt.clGetDeviceInfo)(
                self.id,
                CL_DEVICE_MAX_WORK_ITEM_SIZES,
                0,
                ptr::null_mut(),
                &mut size,
            )
        };
        check_quiet(status, "Determining work item sizes length")?;

        let mut sizes = vec![0usize; size / mem::size_of::<usize>()];
        let status = unsafe {
            (rt.clGetDeviceInfo)(
                self.id,
                CL_DEVICE_MAX_WORK_ITEM_SIZES,
                sizes.len() * mem::size_of::<usize>(),
                sizes.as_mut_ptr() as *mut c_void,
                ptr::null_mut(),
            )
        };
        check_quiet(status, "Getting work item sizes")?;
        Ok(sizes)
    }

    pub fn max_work_group_size(&self) -> Result<usize> {
        self.scalar_info(CL_DEVICE_MAX_WORK_GROUP_SIZE)
    }

    /// The maximum clock frequency in MHz.
    pub fn max_clock_frequency(&self) -> Result<cl_uint> {
        self.scalar_info(CL_DEVICE_MAX_CLOCK_FREQUENCY)
    }

    pub fn address_bits(&self) -> Result<cl_uint> {
        self.scalar_info(CL_DEVICE_ADDRESS_BITS)
    }

    /// The maximum memory allocation size of this device.
    pub fn max_mem_alloc_size(&self) -> Result<cl_ulong> {
        self.scalar_info(CL_DEVICE_MAX_MEM_ALLOC_SIZE)
    }

    /// The global memory size of this device.
    pub fn global_mem_size(&self) -> Result<cl_ulong> {
        self.scalar_info(CL_DEVICE_GLOBAL_MEM_SIZE)
    }

    pub fn error_correction_support(&self) -> Result<bool> {
        self.bool_info(CL_DEVICE_ERROR_CORRECTION_SUPPORT)
    }

    pub fn local_mem_type(&self) -> Result<cl_device_local_mem_type> {
        self.scalar_info(CL_DEVICE_LOCAL_MEM_TYPE)
    }

    /// The local memory size of this device.
    pub fn local_mem_size(&self) -> Result<cl_ulong> {
        self.scalar_info(CL_DEVICE_LOCAL_MEM_SIZE)
    }

    pub fn max_constant_buffer_size(&self) -> Result<cl_ulong> {
        self.scalar_info(CL_DEVICE_MAX_CONSTANT_BUFFER_SIZE)
    }

    pub fn queue_properties(&self) -> Result<cl_command_queue_properties> {
        self.scalar_info(CL_DEVICE_QUEUE_PROPERTIES)
    }

    pub fn image_support(&self) -> Result<bool> {
        self.bool_info(CL_DEVICE_IMAGE_SUPPORT)
    }

    pub fn max_read_image_args(&self) -> Result<cl_uint> {
        self.scalar_info(CL_DEVICE_MAX_READ_IMAGE_ARGS)
    }

    pub fn max_write_image_args(&self) -> Result<cl_uint> {
        self.scalar_info(CL_DEVICE_MAX_WRITE_IMAGE_ARGS)
    }

    pub fn single_fp_config(&self) -> Result<cl_device_fp_config> {
        self.scalar_info(CL_DEVICE_SINGLE_FP_CONFIG)
    }

    /// Image limits as `(2D width, 2D height)`.
    pub fn image2d_max_size(&self) -> Result<(usize, usize)> {
        Ok((
            self.scalar_info(CL_DEVICE_IMAGE2D_MAX_WIDTH)?,
            self.scalar_info(CL_DEVICE_IMAGE2D_MAX_HEIGHT)?,
        ))
    }

    /// Image limits as `(3D width, 3D height, 3D depth)`.
    pub fn image3d_max_size(&self) -> Result<(usize, usize, usize)> {
        Ok((
            self.scalar_info(CL_DEVICE_IMAGE3D_MAX_WIDTH)?,
            self.scalar_info(CL_DEVICE_IMAGE3D_MAX_HEIGHT)?,
            self.scalar_info(CL_DEVICE_IMAGE3D_MAX_DEPTH)?,
        ))
    }

    pub fn preferred_vector_width(&self, ty: VectorType) -> Result<cl_uint> {
        self.scalar_info(ty.param())
    }
}
