//! Render a [`ResultModel`] into EFDataMappingKit Objective-C sources.
//!
//! Per class: `{Name}.h`, `{Name}.m`, `{Name}+Mappings.h`, `{Name}+Mappings.m`.
//! Once per run: `{Prefix}Mapper.h` / `{Prefix}Mapper.m`, which registers every
//! class's mappings with the mapper.
use chrono::{Datelike, NaiveDate};
use indexmap::IndexMap;
use tracing::warn;

use crate::ir::{ClassDescription, ResultModel};
use crate::lower::lower_field;
use crate::naming::registrar_name;

/// File name → file text, in emission order.
pub type RenderedFiles = IndexMap<String, String>;

#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub prefix: String,
    pub project_name: String,
    pub author: String,
    pub date: NaiveDate,
}

impl RenderConfig {
    /// `d/m/yyyy`, unpadded.
    pub fn date_label(&self) -> String {
        self.date.format("%-d/%-m/%Y").to_string()
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn mapper_name(&self) -> String {
        registrar_name(&self.prefix)
    }
}

pub struct Codegen<'a> {
    config: &'a RenderConfig,
    files: RenderedFiles,
}

impl<'a> Codegen<'a> {
    pub fn new(config: &'a RenderConfig) -> Self {
        Self { config, files: RenderedFiles::new() }
    }

    pub fn emit(&mut self, model: &ResultModel) {
        let mapper = self.config.mapper_name();
        let interface = self.mapper_interface();
        let implementation = self.mapper_implementation(model);
        self.add(format!("{mapper}.h"), interface);
        self.add(format!("{mapper}.m"), implementation);
        for class in model.classes() {
            if class.name == mapper {
                warn!(class = %class.name, "class shadows the mapper, skipped");
                continue;
            }
            self.emit_class(class);
        }
    }

    fn emit_class(&mut self, class: &ClassDescription) {
        let name = &class.name;
        let rendered = [
            (format!("{name}.h"), self.class_interface(class)),
            (format!("{name}.m"), self.class_implementation(class)),
            (format!("{name}+Mappings.h"), self.mappings_interface(class)),
            (format!("{name}+Mappings.m"), self.mappings_implementation(class)),
        ];
        for (file_name, text) in rendered {
            self.add(file_name, text);
        }
    }

    pub fn into_files(self) -> RenderedFiles {
        self.files
    }

    fn add(&mut self, file_name: String, text: String) {
        self.files.insert(file_name, text);
    }

    // --------------------------- templates ------------------------------- //

    fn banner(&self, file_name: &str) -> String {
        format!(
            "//\n// {file_name}\n// {project}\n//\n// Created by EFDataMappingKit Generator on {date}.\n// Copyright (c) {year} {author}. All rights reserved.\n//\n\n",
            project = self.config.project_name,
            date = self.config.date_label(),
            year = self.config.year(),
            author = self.config.author,
        )
    }

    fn class_interface(&self, class: &ClassDescription) -> String {
        let name = &class.name;
        let mut declarations = String::new();
        for referenced in &class.referenced_class_names {
            declarations.push_str(&format!("@class {referenced};\n"));
        }
        if !class.referenced_class_names.is_empty() {
            declarations.push('\n');
        }
        let mut properties = String::new();
        for field in &class.fields {
            let property = lower_field(field);
            properties.push_str(&format!(
                "@property (nonatomic, {}) {}{};\n",
                property.attribute, property.type_decl, field.internal_key
            ));
        }
        format!(
            "{banner}#import <Foundation/Foundation.h>\n\n{declarations}@interface {name} : NSObject\n\n{properties}\n@end\n\n",
            banner = self.banner(&format!("{name}.h")),
        )
    }

    fn class_implementation(&self, class: &ClassDescription) -> String {
        let name = &class.name;
        format!(
            "{banner}#import \"{name}.h\"\n\n@implementation {name}\n\n@end\n\n",
            banner = self.banner(&format!("{name}.m")),
        )
    }

    fn mappings_interface(&self, class: &ClassDescription) -> String {
        let name = &class.name;
        format!(
            "{banner}#import \"{name}.h\"\n\n@interface {name} (Mappings)\n\n+ (NSArray *)mappings;\n\n@end\n\n",
            banner = self.banner(&format!("{name}+Mappings.h")),
        )
    }

    fn mappings_implementation(&self, class: &ClassDescription) -> String {
        let name = &class.name;
        let mut imports = String::new();
        for referenced in &class.referenced_class_names {
            imports.push_str(&format!("#import \"{referenced}.h\"\n"));
        }
        let mut mappings = String::new();
        for field in &class.fields {
            let property = lower_field(field);
            let constructor = if property.collection { "mappingForArray" } else { "mapping" };
            mappings.push_str(&format!(
                "             [EFMapping {constructor}:^(EFMapping *m) {{\n                 m.externalKey = @\"{external}\";\n                 m.internalKey = @\"{internal}\";\n                 m.internalClass = [{class} class];\n             }}],\n",
                external = objc_escape(&field.external_key),
                internal = objc_escape(&field.internal_key),
                class = property.internal_class,
            ));
        }
        format!(
            "{banner}#import \"{name}+Mappings.h\"\n\n{imports}#import <EFDataMappingKit/EFDataMappingKit.h>\n\n@implementation {name} (Mappings)\n\n+ (NSArray *)mappings {{\n    return @[\n{mappings}\n            ];\n}}\n\n@end\n\n",
            banner = self.banner(&format!("{name}+Mappings.m")),
        )
    }

    fn mapper_interface(&self) -> String {
        let mapper = self.config.mapper_name();
        format!(
            "{banner}#import <EFDataMappingKit/EFDataMappingKit.h>\n\n@interface {mapper} : EFMapper\n\n@end\n\n",
            banner = self.banner(&format!("{mapper}.h")),
        )
    }

    fn mapper_implementation(&self, model: &ResultModel) -> String {
        let mapper = self.config.mapper_name();
        let mut imports = String::new();
        let mut registrations = String::new();
        for name in model.class_names().filter(|name| *name != mapper) {
            imports.push_str(&format!("#import \"{name}+Mappings.h\"\n"));
            registrations.push_str(&format!(
                "        [self registerMappings:[{name} mappings] forClass:[{name} class]];\n"
            ));
        }
        format!(
            "{banner}#import \"{mapper}.h\"\n\n{imports}\n@implementation {mapper}\n\n- (id)init {{\n    self = [super init];\n    if (self) {{\n{registrations}    }}\n    return self;\n}}\n\n@end\n\n",
            banner = self.banner(&format!("{mapper}.m")),
        )
    }
}

/// Render every class of `model` plus the mapper registrar.
pub fn render(model: &ResultModel, config: &RenderConfig) -> RenderedFiles {
    let mut cg = Codegen::new(config);
    cg.emit(model);
    cg.into_files()
}

fn objc_escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
