use winit::event::{DeviceEvent, WindowEvent};

use crate::xr::XrEvent;

/// Everything the game loop gets told about the outside world.
#[derive(Clone, Debug)]
pub enum EngineEvent {
    Window { event: WindowEvent },
    Device { event: DeviceEvent },
    Xr { event: XrEvent },
    Application { event: ApplicationEvent },
}

#[derive(Clone, Debug)]
pub enum ApplicationEvent {
    Exit,
}

impl From<ApplicationEvent> for EngineEvent {
    fn from(event: ApplicationEvent) -> Self {
        Self::Application { event }
    }
}

impl From<XrEvent> for EngineEvent {
    fn from(event: XrEvent) -> Self {
        Self::Xr { event }
    }
}
