//! The watchface window

use embedded_graphics::{
    draw_target::DrawTarget,
    pixelcolor::{Rgb565, RgbColor},
    primitives::Rectangle,
};

/// Layers that can be placed on the window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LayerId {
    Background,
    BluetoothIcon,
    Battery,
    Time,
    Date,
}

const MAX_CHILDREN: usize = 5;

/// Full screen window with its layers stacked bottom to top
pub struct Window {
    bounds: Rectangle,
    background: Rgb565,
    children: heapless::Vec<LayerId, MAX_CHILDREN>,
}

impl Window {
    pub fn new(bounds: Rectangle) -> Self {
        Self {
            bounds,
            background: Rgb565::WHITE,
            children: heapless::Vec::new(),
        }
    }

    pub fn bounds(&self) -> Rectangle {
        self.bounds
    }

    pub fn set_background_color(&mut self, color: Rgb565) {
        self.background = color;
    }

    /// Put a layer on top of the stack. Adding a layer twice keeps its
    /// original position.
    pub fn add_child(&mut self, id: LayerId) {
        if !self.children.contains(&id) {
            // Capacity covers every LayerId
            let _ = self.children.push(id);
        }
    }

    pub fn remove_all_children(&mut self) {
        self.children.clear();
    }

    pub fn children(&self) -> &[LayerId] {
        &self.children
    }

    /// Fill the window with its background color, then draw each layer in
    /// stacking order.
    pub fn render<D, F>(&self, target: &mut D, mut draw_child: F) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
        F: FnMut(LayerId, &mut D) -> Result<(), D::Error>,
    {
        target.fill_solid(&self.bounds, self.background)?;
        for id in self.children.iter() {
            draw_child(*id, target)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::{
        geometry::{Point, Size},
        mock_display::MockDisplay,
    };

    #[test]
    fn children_keep_insertion_order() {
        let mut window = Window::new(Rectangle::new(Point::zero(), Size::new(8, 8)));
        window.add_child(LayerId::Background);
        window.add_child(LayerId::Time);
        window.add_child(LayerId::Background);
        window.add_child(LayerId::Date);
        assert_eq!(
            window.children(),
            &[LayerId::Background, LayerId::Time, LayerId::Date]
        );

        window.remove_all_children();
        assert!(window.children().is_empty());
    }

    #[test]
    fn render_clears_then_draws_children() {
        let mut window = Window::new(Rectangle::new(Point::zero(), Size::new(4, 4)));
        window.set_background_color(Rgb565::BLUE);
        window.add_child(LayerId::Battery);
        window.add_child(LayerId::Date);

        let mut display = MockDisplay::<Rgb565>::new();
        display.set_allow_overdraw(true);
        let mut drawn = std::vec::Vec::new();
        window
            .render(&mut display, |id, _| {
                drawn.push(id);
                Ok(())
            })
            .unwrap();

        assert_eq!(drawn, [LayerId::Battery, LayerId::Date]);
        assert_eq!(display.get_pixel(Point::new(3, 3)), Some(Rgb565::BLUE));
        assert_eq!(display.get_pixel(Point::new(4, 4)), None);
    }
}
