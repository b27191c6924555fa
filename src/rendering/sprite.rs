use crate::glm;
use crate::rendering::data::SpriteVertex;
use crate::utils::constants::VERTICES_PER_SPRITE;

/// normalized rectangle ``(u0, v0) - (u1, v1)`` into the bound texture atlas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TexCoords {
    pub u0: f32,
    pub v0: f32,
    pub u1: f32,
    pub v1: f32,
}

impl TexCoords {
    /// the whole texture
    pub const FULL: Self = Self::new(0.0, 0.0, 1.0, 1.0);

    pub const fn new(u0: f32, v0: f32, u1: f32, v1: f32) -> Self {
        Self { u0, v0, u1, v1 }
    }
}

impl Default for TexCoords {
    fn default() -> Self {
        Self::FULL
    }
}

/// Converts a pixel rectangle ``(x, y, width, height)`` inside an atlas of the given size into normalized texture coordinates.
pub fn map_atlas_rect(
    atlas_width: f32,
    atlas_height: f32,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
) -> TexCoords {
    TexCoords {
        u0: x / atlas_width,
        v0: y / atlas_height,
        u1: (x + width) / atlas_width,
        v1: (y + height) / atlas_height,
    }
}

/// Description of a single sprite. The batch only stores the expanded vertices, so keep the sprite around to update it later.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    /// center point
    pub position: glm::Vec2,
    pub size: glm::Vec2,
    /// RGBA
    pub color: glm::Vec4,
    pub tex_coords: TexCoords,
    /// degrees about the center
    pub rotation: f32,
}

impl Sprite {
    /// creates a white, unrotated sprite showing the whole texture
    pub fn new(position: glm::Vec2, size: glm::Vec2) -> Self {
        Self {
            position,
            size,
            color: glm::vec4(1.0, 1.0, 1.0, 1.0),
            tex_coords: TexCoords::FULL,
            rotation: 0.0,
        }
    }

    pub fn with_color(mut self, color: glm::Vec4) -> Self {
        self.color = color;
        self
    }

    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn with_tex_coords(mut self, tex_coords: TexCoords) -> Self {
        self.tex_coords = tex_coords;
        self
    }

    /// shows the pixel rectangle ``(x, y, width, height)`` of an atlas with the given size
    pub fn with_atlas_rect(
        mut self,
        atlas_width: f32,
        atlas_height: f32,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> Self {
        self.set_atlas_rect(atlas_width, atlas_height, x, y, width, height);
        self
    }

    /// changes the shown atlas rectangle in place (e.g. for animation frames)
    pub fn set_atlas_rect(
        &mut self,
        atlas_width: f32,
        atlas_height: f32,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) {
        self.tex_coords = map_atlas_rect(atlas_width, atlas_height, x, y, width, height);
    }

    /// expands the sprite into its quad
    #[inline]
    pub fn vertices(&self) -> [SpriteVertex; VERTICES_PER_SPRITE] {
        quad_vertices(self)
    }
}

/// corner signs in winding order: bottom-left, bottom-right, top-right, top-left
const QUAD_CORNERS: [(f32, f32); VERTICES_PER_SPRITE] =
    [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

/// Computes the four vertices of a sprite, rotated about its center and translated to its position.
pub fn quad_vertices(sprite: &Sprite) -> [SpriteVertex; VERTICES_PER_SPRITE] {
    let half_size = sprite.size * 0.5;
    let rotation = (sprite.rotation != 0.0).then(|| {
        let (sin, cos) = sprite.rotation.to_radians().sin_cos();
        glm::Mat2::new(cos, -sin, sin, cos)
    });
    let tc = &sprite.tex_coords;

    let mut vertices = [SpriteVertex::default(); VERTICES_PER_SPRITE];
    for (i, (vertex, (sx, sy))) in vertices.iter_mut().zip(QUAD_CORNERS).enumerate() {
        let offset = half_size.component_mul(&glm::vec2(sx, sy));
        let offset = rotation.map_or(offset, |rot| rot * offset);
        *vertex = SpriteVertex {
            position: offset + sprite.position,
            tex_coords: glm::vec2(
                if i == 0 || i == 3 { tc.u0 } else { tc.u1 },
                if i == 0 || i == 1 { tc.v0 } else { tc.v1 },
            ),
            color: sprite.color,
        };
    }
    vertices
}
