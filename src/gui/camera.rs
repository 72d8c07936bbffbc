use kiss3d::camera::Camera;
use kiss3d::event::WindowEvent;
use kiss3d::resource::ShaderUniform;
use kiss3d::window::Canvas;
use nalgebra::{Isometry3, Matrix4, Perspective3, Point3};

use crate::model::Viewpoint;

// The model owns the actual camera state, in f64. This is just a snapshot of
// it, converted to what kiss3d wants, refreshed once per frame. All input
// goes through the controller instead, so that surface view can veto it.
pub struct ViewCamera {
    eye: Point3<f32>,
    view: Isometry3<f32>,
    projection: Perspective3<f32>,
}

impl ViewCamera {
    pub fn new(viewpoint: &Viewpoint) -> Self {
        let mut camera = ViewCamera {
            eye: Point3::origin(),
            view: Isometry3::identity(),
            projection: Perspective3::new(1.0, 1.0, 1.0, 2.0),
        };
        camera.sync(viewpoint);
        camera
    }

    pub fn sync(&mut self, viewpoint: &Viewpoint) {
        self.eye = nalgebra::convert(viewpoint.eye);
        self.view = nalgebra::convert(viewpoint.view_transform());
        self.projection = Perspective3::new(
            viewpoint.aspect as f32,
            viewpoint.fovy as f32,
            viewpoint.znear as f32,
            viewpoint.zfar as f32,
        );
    }

    fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection.into_inner()
    }

    fn view_matrix(&self) -> Matrix4<f32> {
        self.view.to_homogeneous()
    }
}

impl Camera for ViewCamera {
    fn handle_event(&mut self, _canvas: &Canvas, _event: &WindowEvent) {}

    fn eye(&self) -> Point3<f32> {
        self.eye
    }

    fn view_transform(&self) -> Isometry3<f32> {
        self.view
    }

    fn transformation(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    fn inverse_transformation(&self) -> Matrix4<f32> {
        // Perspective and isometry are both invertible
        self.transformation()
            .try_inverse()
            .unwrap_or_else(Matrix4::identity)
    }

    fn clip_planes(&self) -> (f32, f32) {
        (self.projection.znear(), self.projection.zfar())
    }

    fn update(&mut self, _canvas: &Canvas) {}

    fn upload(
        &self,
        _: usize,
        proj: &mut ShaderUniform<Matrix4<f32>>,
        view: &mut ShaderUniform<Matrix4<f32>>,
    ) {
        proj.upload(&self.projection_matrix());
        view.upload(&self.view_matrix());
    }
}
