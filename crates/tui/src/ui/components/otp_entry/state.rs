use otp_entry_engine::{OtpEntryController, SlotFocus, TokioScheduler};
use otp_entry_types::OtpError;
use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::Rect;

/// Controller type driven by the terminal runtime.
pub type HostController = OtpEntryController<TokioScheduler, SlotFocusFlag>;

/// Slot handle backed by a rat-focus flag. Clones share focus state.
#[derive(Debug, Clone)]
pub struct SlotFocusFlag(FocusFlag);

impl SlotFocus for SlotFocusFlag {
    fn set_focused(&self, focused: bool) {
        self.0.set(focused);
    }
}

/// The OTP controller plus the rat-focus flags registered for its slots.
pub struct OtpEntryState {
    controller: HostController,
    slot_flags: Vec<FocusFlag>,
    container_focus: FocusFlag,
}

impl OtpEntryState {
    /// Registers one focus flag per slot with `controller`.
    pub fn new(mut controller: HostController) -> Result<Self, OtpError> {
        let slot_flags: Vec<FocusFlag> = (0..controller.len())
            .map(|index| FocusFlag::new().with_name(&format!("otp.slot.{index}")))
            .collect();
        for (index, flag) in slot_flags.iter().enumerate() {
            controller.register_slot(index, SlotFocusFlag(flag.clone()))?;
        }
        Ok(Self {
            controller,
            slot_flags,
            container_focus: FocusFlag::new().with_name("otp.group"),
        })
    }

    pub fn controller(&self) -> &HostController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut HostController {
        &mut self.controller
    }

    pub fn len(&self) -> usize {
        self.slot_flags.len()
    }

    pub fn slot_flag(&self, index: usize) -> Option<&FocusFlag> {
        self.slot_flags.get(index)
    }

    /// Index of the slot that currently owns keyboard focus.
    pub fn focused_slot(&self) -> Option<usize> {
        self.slot_flags.iter().position(FocusFlag::get)
    }

    pub fn is_slot_focused(&self, index: usize) -> bool {
        self.slot_flags.get(index).is_some_and(FocusFlag::get)
    }

    /// Slot content as the text a native field would hold.
    pub fn slot_text(&self, index: usize) -> String {
        self.controller.slot_value(index).map(String::from).unwrap_or_default()
    }
}

impl HasFocus for OtpEntryState {
    fn build(&self, builder: &mut FocusBuilder) {
        let start = builder.start(self);

        self.slot_flags.iter().for_each(|flag| {
            builder.leaf_widget(flag);
        });

        builder.end(start);
    }

    fn focus(&self) -> FocusFlag {
        self.container_focus.clone()
    }

    fn area(&self) -> Rect {
        Rect::default()
    }
}
