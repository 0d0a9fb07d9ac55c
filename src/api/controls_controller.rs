use crate::error::{FigureError, FigureResult};
use crate::interaction::{Menu, Slider};
use crate::protocol::{Instruction, RenderDelta};
use crate::render::Renderer;

use super::{FigureSession, InstructionSource};

impl<R: Renderer> FigureSession<R> {
    /// Dispatches the instruction bound to `option` of menu `menu`.
    ///
    /// The menu's `active` index moves to `option` only when the instruction
    /// commits. Effects accumulate; nothing is reverted when another option
    /// is picked later.
    pub fn select_menu_option(&mut self, menu: usize, option: usize) -> FigureResult<RenderDelta> {
        let instruction = self.menu_instruction(menu, option)?;
        self.commit(InstructionSource::Menu { menu, option }, &instruction)
    }

    pub fn submit_menu_option(&mut self, menu: usize, option: usize) -> FigureResult<()> {
        let instruction = self.menu_instruction(menu, option)?;
        self.enqueue(InstructionSource::Menu { menu, option }, instruction)
    }

    /// Dispatches the instruction bound to `step` of slider `slider`.
    pub fn select_slider_step(&mut self, slider: usize, step: usize) -> FigureResult<RenderDelta> {
        let instruction = self.slider_instruction(slider, step)?;
        self.commit(InstructionSource::Slider { slider, step }, &instruction)
    }

    pub fn submit_slider_step(&mut self, slider: usize, step: usize) -> FigureResult<()> {
        let instruction = self.slider_instruction(slider, step)?;
        self.enqueue(InstructionSource::Slider { slider, step }, instruction)
    }

    #[must_use]
    pub fn menu(&self, menu: usize) -> Option<&Menu> {
        self.figure.layout().menus.get(menu)
    }

    #[must_use]
    pub fn slider(&self, slider: usize) -> Option<&Slider> {
        self.figure.layout().sliders.get(slider)
    }

    fn menu_instruction(&self, menu: usize, option: usize) -> FigureResult<Instruction> {
        let control = self
            .menu(menu)
            .ok_or_else(|| FigureError::UnknownControl(format!("menu {menu}")))?;
        Ok(control.option(option)?.instruction.clone())
    }

    fn slider_instruction(&self, slider: usize, step: usize) -> FigureResult<Instruction> {
        let control = self
            .slider(slider)
            .ok_or_else(|| FigureError::UnknownControl(format!("slider {slider}")))?;
        Ok(control.step(step)?.instruction.clone())
    }

    /// Moves the active index of the control that issued a committed
    /// instruction. The control may have been replaced by that instruction,
    /// in which case nothing is marked.
    pub(super) fn mark_control_active(
        &mut self,
        source: InstructionSource,
    ) -> Option<(String, usize)> {
        let layout = self.figure.layout_mut();
        match source {
            InstructionSource::Api => None,
            InstructionSource::Menu { menu, option } => {
                let control = layout.menus.get_mut(menu)?;
                if option >= control.options.len() {
                    return None;
                }
                control.active = Some(option);
                Some((format!("menu {menu}"), option))
            }
            InstructionSource::Slider { slider, step } => {
                let control = layout.sliders.get_mut(slider)?;
                if step >= control.steps.len() {
                    return None;
                }
                control.active = Some(step);
                Some((format!("slider {slider}"), step))
            }
        }
    }
}
