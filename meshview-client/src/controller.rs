//! The viewer controller.
//!
//! The controller owns the scene and the three persistent materials, and turns selection
//! changes into material swaps and property updates. Materials are created once and mutated in
//! place, so a change is visible on every mesh that references them on the next frame.

use std::{cell::RefCell, rc::Rc};

use meshview_core::{
    camera::Camera,
    catalog::{ConfigurationError, SurfaceFinish},
    selection::{LightChoice, Selection, ShadingStyle, TextureChoice},
    Side,
};

use crate::{
    abs::{GpuMesh, GraphicsContext, ShaderCompileError, Texture},
    render::{
        material::{
            GouraudMaterial, LightingModel, LitMaterial, MaterialHandle, PhongMaterial,
            UnlitMaterial,
        },
        programs::ShaderLibrary,
        scene::{MeshEntity, Scene},
    },
};

/// The one instance of each material the model entities switch between.
#[derive(Debug, Clone)]
pub struct MaterialSet {
    pub unlit: Rc<RefCell<UnlitMaterial>>,
    pub gouraud: Rc<RefCell<GouraudMaterial>>,
    pub phong: Rc<RefCell<PhongMaterial>>,
}

impl MaterialSet {
    pub fn new(
        gl: &mut dyn GraphicsContext,
        library: &ShaderLibrary,
    ) -> Result<Self, ShaderCompileError> {
        let unlit = UnlitMaterial::new(gl, library.program(ShadingStyle::Unlit))?;
        let gouraud = GouraudMaterial::new(gl, library.program(ShadingStyle::Gouraud))?;
        let phong = PhongMaterial::new(gl, library.program(ShadingStyle::Phong))?;
        Ok(Self {
            unlit: Rc::new(RefCell::new(unlit)),
            gouraud: Rc::new(RefCell::new(gouraud)),
            phong: Rc::new(RefCell::new(phong)),
        })
    }

    pub fn handle(&self, style: ShadingStyle) -> MaterialHandle {
        match style {
            ShadingStyle::Unlit => MaterialHandle::Unlit(Rc::clone(&self.unlit)),
            ShadingStyle::Gouraud => MaterialHandle::Gouraud(Rc::clone(&self.gouraud)),
            ShadingStyle::Phong => MaterialHandle::Phong(Rc::clone(&self.phong)),
        }
    }

    pub fn set_side(&self, side: Side) {
        self.unlit.borrow_mut().side = side;
        self.gouraud.borrow_mut().side = side;
        self.phong.borrow_mut().side = side;
    }

    /// Applies a finish and texture to all three materials, whichever is in use.
    pub fn apply_finish(&self, finish: &SurfaceFinish, texture: Option<Rc<Texture>>) {
        {
            let mut unlit = self.unlit.borrow_mut();
            unlit.set_color(finish.unlit_color);
            unlit.texture = texture.clone();
        }

        apply_lit_finish(&mut self.gouraud.borrow_mut(), finish, texture.clone());
        apply_lit_finish(&mut self.phong.borrow_mut(), finish, texture);
    }
}

fn apply_lit_finish<M: LightingModel>(
    material: &mut LitMaterial<M>,
    finish: &SurfaceFinish,
    texture: Option<Rc<Texture>>,
) {
    material.ambient_color = finish.ambient;
    material.diffuse_color = finish.diffuse;
    material.specular_color = finish.specular;
    material.shininess = finish.shininess;
    material.texture = texture;
}

/// A catalogue model uploaded to the GPU.
#[derive(Debug, Clone)]
pub struct CatalogModel {
    pub name: String,
    pub mesh: Rc<GpuMesh>,
    pub double_sided: bool,
}

/// A catalogue texture uploaded to the GPU, with the finish that goes with it.
#[derive(Debug, Clone)]
pub struct CatalogTexture {
    pub name: String,
    pub texture: Rc<Texture>,
    pub finish: SurfaceFinish,
}

/// One of the four independent selection axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionAxis {
    Style,
    Model,
    Texture,
    Light,
}

/// Owns the scene and applies selection changes to it.
#[derive(Debug)]
pub struct ViewerController {
    materials: MaterialSet,
    scene: Scene,
    double_sided: Vec<bool>,
    textures: Vec<CatalogTexture>,
    untextured: SurfaceFinish,
    selection: Selection,
}

impl ViewerController {
    /// Creates one model entity per catalogue model and applies `initial`.
    pub fn new(
        materials: MaterialSet,
        models: Vec<CatalogModel>,
        textures: Vec<CatalogTexture>,
        mut scene: Scene,
        untextured: SurfaceFinish,
        initial: &Selection,
    ) -> Result<Self, ConfigurationError> {
        if models.is_empty() {
            return Err(ConfigurationError::NoModels);
        }

        let handle = materials.handle(initial.style);
        let double_sided = models.iter().map(|model| model.double_sided).collect();
        scene.models = models
            .into_iter()
            .map(|model| MeshEntity::new(model.name, model.mesh, handle.clone()))
            .collect();

        let mut controller = Self {
            materials,
            scene,
            double_sided,
            textures,
            untextured,
            selection: initial.clone(),
        };
        controller.apply(initial)?;
        Ok(controller)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn materials(&self) -> &MaterialSet {
        &self.materials
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Applies a complete selection. Nothing changes if any part of it is unknown.
    pub fn apply(&mut self, selection: &Selection) -> Result<(), ConfigurationError> {
        self.model_index(&selection.model)?;
        self.texture_entry(&selection.texture)?;

        self.select_style(selection.style);
        self.select_model(&selection.model)?;
        self.select_texture(&selection.texture)?;
        self.select_light(selection.light);
        Ok(())
    }

    /// Applies a selection by its display name, as a selection widget reports it.
    pub fn select(&mut self, axis: SelectionAxis, value: &str) -> Result<(), ConfigurationError> {
        match axis {
            SelectionAxis::Style => self.select_style(value.parse()?),
            SelectionAxis::Model => self.select_model(value)?,
            SelectionAxis::Texture => self.select_texture(&TextureChoice::from(value))?,
            SelectionAxis::Light => self.select_light(value.parse()?),
        }
        Ok(())
    }

    /// Points every model entity at the persistent material of `style`.
    pub fn select_style(&mut self, style: ShadingStyle) {
        let handle = self.materials.handle(style);
        for entity in &mut self.scene.models {
            entity.material = handle.clone();
        }
        self.selection.style = style;
        log::info!("Shading style: {}", style);
    }

    /// Shows only the model `name` and sets the culling side of all materials to match it.
    pub fn select_model(&mut self, name: &str) -> Result<(), ConfigurationError> {
        let index = self.model_index(name)?;
        for (i, entity) in self.scene.models.iter_mut().enumerate() {
            entity.visible = i == index;
        }

        let side = if self.double_sided[index] {
            Side::Double
        } else {
            Side::Front
        };
        self.materials.set_side(side);
        self.selection.model = name.to_string();
        log::info!("Model: {} ({:?} faces)", name, side);
        Ok(())
    }

    /// Applies the texture and its finish, or the untextured finish, to all materials.
    pub fn select_texture(&mut self, choice: &TextureChoice) -> Result<(), ConfigurationError> {
        match self.texture_entry(choice)? {
            Some(entry) => self
                .materials
                .apply_finish(&entry.finish, Some(Rc::clone(&entry.texture))),
            None => self.materials.apply_finish(&self.untextured, None),
        }
        self.selection.texture = choice.clone();
        log::info!("Texture: {}", choice);
        Ok(())
    }

    pub fn select_light(&mut self, light: LightChoice) {
        let lights = &mut self.scene.lights;
        lights.point.visible = light == LightChoice::Point;
        lights.directional.visible = light == LightChoice::Directional;
        self.selection.light = light;
        log::info!("Light: {}", light);
    }

    /// Selects the model `step` places after the current one, wrapping around.
    pub fn cycle_model(&mut self, step: isize) {
        let count = self.scene.models.len() as isize;
        let current = self.model_index(&self.selection.model).unwrap_or(0) as isize;
        let next = (current + step).rem_euclid(count) as usize;
        let name = self.scene.models[next].name.clone();
        if let Err(err) = self.select_model(&name) {
            log::warn!("{}", err);
        }
    }

    /// Selects the next texture, with "None" between the last and the first.
    pub fn cycle_texture(&mut self) {
        let choices: Vec<TextureChoice> = std::iter::once(TextureChoice::None)
            .chain(self.textures.iter().map(|entry| TextureChoice::Named(entry.name.clone())))
            .collect();
        let current = choices
            .iter()
            .position(|choice| *choice == self.selection.texture)
            .unwrap_or(0);
        let next = choices[(current + 1) % choices.len()].clone();
        if let Err(err) = self.select_texture(&next) {
            log::warn!("{}", err);
        }
    }

    pub fn cycle_light(&mut self) {
        self.select_light(self.selection.light.next());
    }

    pub fn render(&self, gl: &mut dyn GraphicsContext, camera: &dyn Camera) {
        self.scene.render(gl, camera);
    }

    fn model_index(&self, name: &str) -> Result<usize, ConfigurationError> {
        self.scene
            .models
            .iter()
            .position(|entity| entity.name == name)
            .ok_or_else(|| ConfigurationError::UnknownModel(name.to_string()))
    }

    fn texture_entry(
        &self,
        choice: &TextureChoice,
    ) -> Result<Option<&CatalogTexture>, ConfigurationError> {
        match choice {
            TextureChoice::None => Ok(None),
            TextureChoice::Named(name) => self
                .textures
                .iter()
                .find(|entry| entry.name == *name)
                .map(Some)
                .ok_or_else(|| ConfigurationError::UnknownTexture(name.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::{Vec3, Vec4};
    use meshview_core::light::{LightingConfig, Lights};

    use super::*;
    use crate::{abs::recording::GlCall, render::material::test_support::Fixture};

    fn controller(fixture: &mut Fixture) -> ViewerController {
        let materials = MaterialSet::new(&mut fixture.gl, &fixture.library).unwrap();
        let cube = Rc::new(fixture.cube.clone());
        let models = ["sphere", "cube", "cylinder"]
            .into_iter()
            .map(|name| CatalogModel {
                name: name.to_string(),
                mesh: Rc::clone(&cube),
                double_sided: name == "cylinder",
            })
            .collect();
        let textures = vec![
            CatalogTexture {
                name: "Gravel".to_string(),
                texture: Rc::clone(&fixture.texture),
                finish: SurfaceFinish::textured(1.0, 50.0),
            },
            CatalogTexture {
                name: "Bark".to_string(),
                texture: Rc::clone(&fixture.texture),
                finish: SurfaceFinish::textured(0.5, 10.0),
            },
        ];
        let initial = Selection {
            model: "sphere".to_string(),
            ..Selection::default()
        };
        ViewerController::new(
            materials,
            models,
            textures,
            Scene::new(Lights::new(&LightingConfig::default())),
            SurfaceFinish::default(),
            &initial,
        )
        .unwrap()
    }

    fn visible_models(controller: &ViewerController) -> Vec<&str> {
        controller
            .scene()
            .models
            .iter()
            .filter(|entity| entity.visible)
            .map(|entity| entity.name.as_str())
            .collect()
    }

    fn sides(controller: &ViewerController) -> [Side; 3] {
        let materials = controller.materials();
        [
            materials.unlit.borrow().side,
            materials.gouraud.borrow().side,
            materials.phong.borrow().side,
        ]
    }

    #[test]
    fn test_initial_selection_is_applied() {
        let mut fixture = Fixture::new();
        let controller = controller(&mut fixture);

        assert_eq!(visible_models(&controller), vec!["sphere"]);
        assert_eq!(sides(&controller), [Side::Front; 3]);
        assert_eq!(controller.materials().unlit.borrow().color(), Vec4::new(1.0, 0.4, 0.4, 1.0));
        assert!(controller.scene().lights.point.visible);
        assert!(!controller.scene().lights.directional.visible);
        for entity in &controller.scene().models {
            assert_eq!(entity.material.style(), ShadingStyle::Unlit);
        }
    }

    #[test]
    fn test_style_change_swaps_shared_instances() {
        let mut fixture = Fixture::new();
        let mut controller = controller(&mut fixture);
        controller.materials().phong.borrow_mut().shininess = 7.0;

        controller.select_style(ShadingStyle::Phong);

        let phong = controller.materials().handle(ShadingStyle::Phong);
        for entity in &controller.scene().models {
            assert!(entity.material.ptr_eq(&phong));
        }
        assert_eq!(controller.materials().phong.borrow().shininess, 7.0);
        assert_eq!(controller.selection().style, ShadingStyle::Phong);
    }

    #[test]
    fn test_model_change_sets_side_on_all_materials() {
        let mut fixture = Fixture::new();
        let mut controller = controller(&mut fixture);

        controller.select_model("cylinder").unwrap();
        assert_eq!(visible_models(&controller), vec!["cylinder"]);
        assert_eq!(sides(&controller), [Side::Double; 3]);

        controller.select_model("cube").unwrap();
        assert_eq!(visible_models(&controller), vec!["cube"]);
        assert_eq!(sides(&controller), [Side::Front; 3]);
    }

    #[test]
    fn test_texture_change_updates_inactive_materials() {
        let mut fixture = Fixture::new();
        let mut controller = controller(&mut fixture);
        controller.select_style(ShadingStyle::Gouraud);

        controller.select_texture(&TextureChoice::from("Bark")).unwrap();

        let materials = controller.materials();
        let (unlit, gouraud, phong) = (
            materials.unlit.borrow(),
            materials.gouraud.borrow(),
            materials.phong.borrow(),
        );
        assert!(unlit.texture.is_some() && gouraud.texture.is_some() && phong.texture.is_some());
        assert_eq!(unlit.color(), Vec4::ONE);
        for lit in [&gouraud.specular_color, &phong.specular_color] {
            assert_eq!(*lit, Vec3::splat(0.5));
        }
        assert_eq!(gouraud.shininess, 10.0);
        assert_eq!(phong.shininess, 10.0);
        assert_eq!(gouraud.ambient_color, Vec3::ONE);
    }

    #[test]
    fn test_texture_none_restores_untextured_finish() {
        let mut fixture = Fixture::new();
        let mut controller = controller(&mut fixture);
        controller.select_texture(&TextureChoice::from("Gravel")).unwrap();
        controller.select_texture(&TextureChoice::None).unwrap();

        let phong = controller.materials().phong.borrow();
        assert!(phong.texture.is_none());
        assert_eq!(phong.diffuse_color, Vec3::new(1.0, 0.4, 0.4));
        assert_eq!(phong.specular_color, Vec3::ONE);
        assert_eq!(phong.shininess, 50.0);
    }

    #[test]
    fn test_light_change_toggles_entities() {
        let mut fixture = Fixture::new();
        let mut controller = controller(&mut fixture);

        controller.select_light(LightChoice::AmbientOnly);
        let lights = controller.scene().lights;
        assert!(!lights.point.visible && !lights.directional.visible);

        controller.select_light(LightChoice::Directional);
        let lights = controller.scene().lights;
        assert!(!lights.point.visible && lights.directional.visible);
    }

    #[test]
    fn test_unknown_names_leave_state_unchanged() {
        let mut fixture = Fixture::new();
        let mut controller = controller(&mut fixture);
        let before = controller.selection().clone();

        assert!(matches!(
            controller.select(SelectionAxis::Model, "teapot"),
            Err(ConfigurationError::UnknownModel(_))
        ));
        assert!(matches!(
            controller.select(SelectionAxis::Texture, "Marble"),
            Err(ConfigurationError::UnknownTexture(_))
        ));
        assert!(matches!(
            controller.select(SelectionAxis::Style, "Toon"),
            Err(ConfigurationError::UnknownStyle(_))
        ));
        assert!(matches!(
            controller.select(SelectionAxis::Light, "Spot Light"),
            Err(ConfigurationError::UnknownLight(_))
        ));

        let bad = Selection {
            texture: TextureChoice::from("Marble"),
            style: ShadingStyle::Phong,
            ..before.clone()
        };
        assert!(controller.apply(&bad).is_err());
        assert_eq!(controller.selection(), &before);
        assert_eq!(visible_models(&controller), vec!["sphere"]);
    }

    #[test]
    fn test_select_by_display_name() {
        let mut fixture = Fixture::new();
        let mut controller = controller(&mut fixture);
        controller.select(SelectionAxis::Style, "Phong").unwrap();
        controller.select(SelectionAxis::Light, "Ambient Only").unwrap();
        controller.select(SelectionAxis::Texture, "None").unwrap();
        assert_eq!(controller.selection().to_string(), "Phong | sphere | None | Ambient Only");
    }

    #[test]
    fn test_cycling_wraps_around() {
        let mut fixture = Fixture::new();
        let mut controller = controller(&mut fixture);

        controller.cycle_model(-1);
        assert_eq!(controller.selection().model, "cylinder");
        controller.cycle_model(1);
        assert_eq!(controller.selection().model, "sphere");

        let mut seen = Vec::new();
        for _ in 0..3 {
            controller.cycle_texture();
            seen.push(controller.selection().texture.name().to_string());
        }
        assert_eq!(seen, vec!["Gravel", "Bark", "None"]);

        controller.cycle_light();
        assert_eq!(controller.selection().light, LightChoice::Directional);
    }

    #[test]
    fn test_render_draws_only_selected_model() {
        let mut fixture = Fixture::new();
        let mut controller = controller(&mut fixture);
        controller.select_style(ShadingStyle::Gouraud);
        fixture.gl.calls.clear();

        controller.render(&mut fixture.gl, &fixture.camera);

        assert_eq!(fixture.gl.draw_count(), 1);
        let program = controller.materials().gouraud.borrow().program().borrow().id().unwrap();
        assert_eq!(fixture.gl.calls[0], GlCall::UseProgram(program));
    }
}
