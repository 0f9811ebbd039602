//! Transient toast notifications.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Maximum number of toasts on screen at once
pub const TOAST_LIMIT: usize = 3;

/// How long a toast stays up unless told otherwise
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastVariant {
    #[default]
    Default,
    Destructive,
}

/// What to show in a toast
#[derive(Debug, Clone, Default)]
pub struct ToastProps {
    pub title: Option<String>,
    pub description: Option<String>,
    pub variant: ToastVariant,
    pub duration: Option<Duration>,
}

impl ToastProps {
    #[allow(dead_code)] // Used in tests
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        ToastProps {
            title: Some(title.into()),
            description: Some(description.into()),
            ..Default::default()
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        ToastProps {
            title: Some(title.into()),
            description: Some(description.into()),
            variant: ToastVariant::Destructive,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub props: ToastProps,
    expires_at: Instant,
}

/// Queue of visible toasts, oldest first
#[derive(Debug, Default)]
pub struct Toaster {
    toasts: VecDeque<Toast>,
}

impl Toaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a toast, evicting the oldest if the limit is reached
    pub fn toast(&mut self, props: ToastProps, now: Instant) {
        while self.toasts.len() >= TOAST_LIMIT {
            self.toasts.pop_front();
        }
        let duration = props.duration.unwrap_or(DEFAULT_TOAST_DURATION);
        self.toasts.push_back(Toast {
            props,
            expires_at: now + duration,
        });
    }

    /// Drop toasts whose duration has elapsed
    pub fn prune(&mut self, now: Instant) {
        self.toasts.retain(|t| t.expires_at > now);
    }

    pub fn visible(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    #[allow(dead_code)] // Used in tests
    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    #[allow(dead_code)] // Used in tests
    pub fn len(&self) -> usize {
        self.toasts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_drops_oldest() {
        let now = Instant::now();
        let mut toaster = Toaster::new();
        for i in 0..5 {
            toaster.toast(ToastProps::info(format!("t{i}"), ""), now);
        }
        assert_eq!(toaster.len(), TOAST_LIMIT);
        let titles: Vec<_> = toaster
            .visible()
            .map(|t| t.props.title.clone().unwrap())
            .collect();
        assert_eq!(titles, vec!["t2", "t3", "t4"]);
    }

    #[test]
    fn test_each_toast_expires_on_its_own() {
        let now = Instant::now();
        let mut toaster = Toaster::new();
        toaster.toast(
            ToastProps {
                title: Some("short".into()),
                duration: Some(Duration::from_millis(500)),
                ..Default::default()
            },
            now,
        );
        toaster.toast(ToastProps::error("long", "uses default"), now);

        toaster.prune(now + Duration::from_millis(499));
        assert_eq!(toaster.len(), 2);
        toaster.prune(now + Duration::from_millis(500));
        assert_eq!(toaster.len(), 1);
        assert_eq!(
            toaster.visible().next().unwrap().props.variant,
            ToastVariant::Destructive
        );
        toaster.prune(now + DEFAULT_TOAST_DURATION);
        assert!(toaster.is_empty());
    }
}
