use ort::execution_providers::ExecutionProviderDispatch;

/// Compute device chosen for inference, with the providers that back it.
pub struct ExecutionDevice {
    pub name: &'static str,
    pub providers: Vec<ExecutionProviderDispatch>,
}

/// Pick the preferred ONNX execution providers for this build and platform.
///
/// CUDA is tried first when built with the `cuda` feature and a usable
/// runtime is present. An empty provider list means ONNX Runtime's CPU
/// provider.
pub fn select_execution_device() -> ExecutionDevice {
    #[cfg(feature = "cuda")]
    {
        use ort::execution_providers::{CUDAExecutionProvider, ExecutionProvider};

        let cuda = CUDAExecutionProvider::default();
        if cuda.is_available().unwrap_or(false) {
            return ExecutionDevice {
                name: "cuda",
                providers: vec![cuda.build()],
            };
        }
    }

    platform_default()
}

fn platform_default() -> ExecutionDevice {
    #[cfg(target_os = "macos")]
    {
        ExecutionDevice {
            name: "coreml",
            providers: vec![ort::execution_providers::CoreMLExecutionProvider::default().build()],
        }
    }
    #[cfg(target_os = "windows")]
    {
        ExecutionDevice {
            name: "directml",
            providers: vec![ort::execution_providers::DirectMLExecutionProvider::default().build()],
        }
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        ExecutionDevice {
            name: "cpu",
            providers: vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(not(any(target_os = "macos", target_os = "windows", feature = "cuda")))]
    fn test_falls_back_to_cpu() {
        let device = select_execution_device();
        assert_eq!(device.name, "cpu");
        assert!(device.providers.is_empty());
    }
}
